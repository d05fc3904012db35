//! Property-based tests for enter/exit balance and stack reconstruction

use dynscope::ContextStack;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

static CASE: AtomicUsize = AtomicUsize::new(0);

/// A fresh family per case so a failing case cannot leak levels into the next.
fn fresh_stack(prefix: &str) -> ContextStack<u32> {
    ContextStack::new(format!("{}-{}", prefix, CASE.fetch_add(1, Ordering::Relaxed)))
}

#[derive(Debug, Clone)]
enum Op {
    Enter(Option<u32>),
    Set(u32),
    Exit,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => any::<Option<u32>>().prop_map(Op::Enter),
        1 => any::<u32>().prop_map(Op::Set),
        2 => Just(Op::Exit),
    ]
}

/// Arbitrary enter/set/exit sequences track a simple vector model
#[test]
fn test_operations_match_vector_model() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(op_strategy(), 0..64), |ops| {
            let stack = fresh_stack("model");
            let mut model: Vec<Option<u32>> = Vec::new();

            for op in ops {
                match op {
                    Op::Enter(value) => {
                        let level = stack.enter_unguarded().unwrap();
                        prop_assert_eq!(level, model.len() + 1);
                        if let Some(value) = value {
                            stack.set_value(value);
                        }
                        model.push(value);
                    }
                    Op::Set(value) => {
                        stack.set_value(value);
                        if let Some(top) = model.last_mut() {
                            *top = Some(value);
                        }
                    }
                    Op::Exit => {
                        let result = stack.exit();
                        if model.pop().is_some() {
                            prop_assert_eq!(result.unwrap(), model.len());
                        } else {
                            prop_assert!(result.unwrap_err().is_imbalance());
                        }
                    }
                }

                prop_assert_eq!(stack.level(), model.len());
                prop_assert_eq!(stack.get_stack(), model.clone());
                if !model.is_empty() {
                    prop_assert_eq!(stack.get_value(), model.last().cloned().flatten());
                }
            }

            while stack.level() > 0 {
                stack.exit().unwrap();
            }
            Ok(())
        })
        .unwrap();
}

/// Nested guards always restore the level and value that preceded them
#[test]
fn test_guards_restore_enclosing_state() {
    fn nest(stack: &ContextStack<u32>, values: &[u32]) -> Result<(), TestCaseError> {
        let Some((first, rest)) = values.split_first() else {
            return Ok(());
        };
        let before_level = stack.level();
        let before_value = stack.get_value();

        let guard = stack.enter().unwrap();
        stack.set_value(*first);
        prop_assert_eq!(stack.get_value(), Some(*first));
        nest(stack, rest)?;
        prop_assert_eq!(stack.get_value(), Some(*first));
        drop(guard);

        prop_assert_eq!(stack.level(), before_level);
        prop_assert_eq!(stack.get_value(), before_value);
        Ok(())
    }

    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(any::<Option<u32>>(), prop::collection::vec(any::<u32>(), 0..32)),
            |(base, values)| {
                let stack = fresh_stack("guards");
                if let Some(base) = base {
                    stack.set_value(base);
                }
                nest(&stack, &values)?;
                prop_assert_eq!(stack.level(), 0);
                prop_assert_eq!(stack.get_value(), base);
                Ok(())
            },
        )
        .unwrap();
}

/// The stack view lists every entered level outermost first
#[test]
fn test_get_stack_reconstructs_levels() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::vec(any::<Option<u32>>(), 0..32),
            |values| {
                let stack = fresh_stack("reconstruct");
                for value in &values {
                    stack.enter_unguarded().unwrap();
                    if let Some(value) = value {
                        stack.set_value(*value);
                    }
                }

                prop_assert_eq!(stack.get_stack(), values.clone());
                for (index, value) in values.iter().enumerate() {
                    prop_assert_eq!(stack.get_value_at(index + 1), *value);
                }
                let nearest = values.iter().rev().find_map(|value| *value);
                prop_assert_eq!(stack.get_nearest(), nearest);

                for _ in &values {
                    stack.exit().unwrap();
                }
                prop_assert_eq!(stack.level(), 0);
                Ok(())
            },
        )
        .unwrap();
}
