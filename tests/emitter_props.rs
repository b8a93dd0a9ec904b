use std::collections::HashSet;

use proptest::prelude::*;

use shadegen::emitter::{self, SlotBindings};
use shadegen::{FunctionRegistry, FunctionVariant, Precision, SlotDescriptor};

fn test_variant() -> FunctionVariant {
    FunctionVariant::new(
        "Prop_Mix",
        vec![
            SlotDescriptor::input(0, "Base", 4),
            SlotDescriptor::input(1, "Blend", 4),
            SlotDescriptor::output(2, "Out", 4),
        ],
        "{
    $precision{slot2dimension} t = Base * Blend;
    Out = t;
}",
    )
}

fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,11}"
}

proptest! {
    #[test]
    fn emit_is_deterministic_for_identical_inputs(
        base in ident(),
        blend in ident(),
        out in ident(),
        half in any::<bool>(),
    ) {
        let variant = test_variant();
        let bindings = SlotBindings::from([(0u32, base), (1, blend), (2, out)]);
        let precision = if half { Precision::Half } else { Precision::Full };

        let mut r1 = FunctionRegistry::new();
        let mut r2 = FunctionRegistry::new();
        let a = emitter::emit(&variant, &bindings, precision, &mut r1).unwrap();
        let b = emitter::emit(&variant, &bindings, precision, &mut r2).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn registry_emits_each_key_exactly_once(
        keys in proptest::collection::vec("[a-z]{1,6}", 1..32),
    ) {
        let mut registry = FunctionRegistry::new();
        for key in &keys {
            registry
                .provide(key, |s| {
                    s.push_str("// ");
                    s.push_str(key);
                    s.push('\n');
                })
                .unwrap();
        }

        let collected = registry.collect();
        let unique: HashSet<&String> = keys.iter().collect();
        for key in unique {
            prop_assert_eq!(collected.matches(&format!("// {key}\n")).count(), 1);
        }
    }
}
