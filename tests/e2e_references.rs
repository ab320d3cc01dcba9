//! Reference properties, tree walking and shared access over a small
//! schema-like model: a module of types, each with fields, where fields may
//! refer to other types.

mod common;

use model_tree::{Error, Model, Node, NodePath, SharedTree, model};
use pretty_assertions::assert_eq;

model! {
    pub struct TypeDecl {
        name / name_mut: value(String),
        fields / fields_mut: composites(FieldDecl),
        bases / bases_mut: references(TypeDecl),
    }
}

model! {
    pub struct FieldDecl {
        name / name_mut: value(String),
        optional / optional_mut: value(bool),
        target / target_mut: reference(TypeDecl),
    }
}

model! {
    pub struct Module {
        types / types_mut: composites(TypeDecl),
    }
}

fn type_path(pos: usize) -> NodePath {
    NodePath::root().key("types").index(pos)
}

/// `Point { x }`, `Shape { origin: Point }`, `Circle : Shape`.
fn sample_module() -> Module {
    let mut module = Module::new();
    let mut types = module.types_mut();

    let point = types.ensure(0).unwrap();
    point.name_mut().set("Point").unwrap();
    point.fields_mut().ensure(0).unwrap().name_mut().set("x").unwrap();

    let shape = types.ensure(1).unwrap();
    shape.name_mut().set("Shape").unwrap();
    let mut shape_fields = shape.fields_mut();
    let origin = shape_fields.ensure(0).unwrap();
    origin.name_mut().set("origin").unwrap();
    origin.target_mut().set(type_path(0)).unwrap();

    let circle = types.ensure(2).unwrap();
    circle.name_mut().set("Circle").unwrap();
    circle.bases_mut().push(type_path(1)).unwrap();

    module
}

// ============================================================================
// 1. Resolution
// ============================================================================

#[test]
fn test_reference_resolves_against_root() {
    let module = sample_module();
    let shape = module.types().get(1).unwrap();
    let origin = shape.fields().get(0).unwrap();

    let target = origin.target().resolve(module.as_node()).unwrap();
    assert_eq!(target.name().value().unwrap(), "Point");
}

#[test]
fn test_references_list_resolves_in_order() {
    let mut module = sample_module();
    module
        .types_mut()
        .get_mut(2)
        .unwrap()
        .bases_mut()
        .push("types[0]".parse().unwrap())
        .unwrap();

    let types = module.types();
    let circle = types.get(2).unwrap();
    let names: Vec<String> = circle
        .bases()
        .resolve_all(module.as_node())
        .unwrap()
        .into_iter()
        .map(|base| base.name().value().unwrap().clone())
        .collect();
    assert_eq!(names, vec!["Shape", "Point"]);
}

#[test]
fn test_unset_reference_is_null() {
    let module = sample_module();
    let types = module.types();
    let point = types.get(0).unwrap();
    let fields = point.fields();
    let x = fields.get(0).unwrap();

    assert!(!x.target().is_present());
    assert_eq!(
        x.target().resolve(module.as_node()).unwrap_err(),
        Error::NullReference { key: "target".into() }
    );
}

// ============================================================================
// 2. References do not own their targets
// ============================================================================

#[test]
fn test_removing_target_leaves_reference_dangling() {
    let mut module = sample_module();
    module.types_mut().remove(2).unwrap();
    module.types_mut().remove(0).unwrap();

    // Shape's field still stores `types[0]`, which is now Shape itself.
    let types = module.types();
    let shape = types.get(0).unwrap();
    let fields = shape.fields();
    let origin = fields.get(0).unwrap();
    let resolved = origin.target().resolve(module.as_node()).unwrap();
    assert_eq!(resolved.name().value().unwrap(), "Shape");

    module.types_mut().clear();
    let mut detached = FieldDecl::new();
    detached.target_mut().set(type_path(0)).unwrap();
    assert!(matches!(
        detached.target().resolve(module.as_node()),
        Err(Error::DanglingReference { .. })
    ));
}

#[test]
fn test_clearing_reference_keeps_target() {
    let mut module = sample_module();
    {
        let mut types = module.types_mut();
        let shape = types.get_mut(1).unwrap();
        let mut fields = shape.fields_mut();
        assert!(fields.get_mut(0).unwrap().target_mut().clear());
    }

    assert_eq!(module.types().len(), 3);
    assert_eq!(module.types().get(0).unwrap().name().value().unwrap(), "Point");
}

#[test]
fn test_reference_to_wrong_type_is_type_mismatch() {
    let module = sample_module();
    let mut field = FieldDecl::new();
    field
        .target_mut()
        .set(type_path(0).key("fields").index(0))
        .unwrap();

    let err = field.target().resolve(module.as_node()).unwrap_err();
    assert!(err.is_integrity_violation());
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn test_cloned_module_references_resolve_into_clone() {
    let original = sample_module();
    let mut copy = original.clone();
    copy.types_mut().get_mut(0).unwrap().name_mut().set("Vec2").unwrap();

    let types = copy.types();
    let circle = types.get(2).unwrap();
    let base = circle.bases().resolve(0, copy.as_node()).unwrap();
    let fields = base.fields();
    let target = fields.get(0).unwrap().target().resolve(copy.as_node()).unwrap();
    assert_eq!(target.name().value().unwrap(), "Vec2");
}

// ============================================================================
// 3. Tree walking
// ============================================================================

fn collect_paths(node: &dyn Node, at: NodePath, out: &mut Vec<String>) {
    if let Some(composite) = node.as_composite() {
        for (key, child) in composite.iter() {
            collect_paths(child, at.clone().key(key), out);
        }
    } else if let Some(list) = node.as_list() {
        for (pos, child) in list.iter().enumerate() {
            collect_paths(child, at.clone().index(pos), out);
        }
    } else {
        out.push(at.to_string());
    }
}

#[test]
fn test_walk_visits_leaves_in_insertion_order() {
    let module = sample_module();
    let mut paths = Vec::new();
    collect_paths(module.as_node(), NodePath::root(), &mut paths);

    assert_eq!(
        paths,
        vec![
            "types[0].name",
            "types[0].fields[0].name",
            "types[1].name",
            "types[1].fields[0].name",
            "types[1].fields[0].target",
            "types[2].name",
            "types[2].bases",
        ]
    );

    for path in &paths {
        let parsed: NodePath = path.parse().unwrap();
        assert!(module.composite().resolve(&parsed).is_some(), "{path}");
    }
}

// ============================================================================
// 4. Shared access
// ============================================================================

#[test]
fn test_shared_module_serializes_writers() {
    let shared = SharedTree::new(Module::new());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for i in 0..10 {
                    shared.with(|module| {
                        let mut decl = TypeDecl::new();
                        decl.name_mut().set(format!("T{t}_{i}")).unwrap();
                        module.types_mut().push(decl).unwrap();
                    });
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let module = shared.into_inner().unwrap();
    assert_eq!(module.types().len(), 40);
}
