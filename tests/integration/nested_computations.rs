//! Integration tests for computations resumed from inside other computations

use dynscope::{Co, ContextStack, Resumable};

#[derive(Debug, Clone, PartialEq)]
struct View {
    tenant: Option<&'static str>,
    span_depth: usize,
}

#[test]
fn test_inner_scopes_do_not_leak_into_outer_computation() {
    let tenant: ContextStack<&'static str> = ContextStack::new("tenant");
    let span: ContextStack<u32> = ContextStack::new("span");

    let (t, s) = (tenant.clone(), span.clone());
    let mut outer = Resumable::new(move |co: Co<(View, View)>| async move {
        let _tenant = t.enter()?;
        t.set_value("outer");

        let (ti, si) = (t.clone(), s.clone());
        let mut inner = Resumable::new(move |co: Co<View>| async move {
            let _span = si.enter()?;
            si.set_value(1);
            co.suspend(View {
                tenant: ti.get_value(),
                span_depth: si.level(),
            })
            .await;
            anyhow::Ok(())
        });

        let seen_by_inner = inner.resume()?.suspended().unwrap_or(View {
            tenant: None,
            span_depth: 0,
        });
        let seen_by_outer = View {
            tenant: t.get_value(),
            span_depth: s.level(),
        };
        co.suspend((seen_by_inner, seen_by_outer)).await;
        anyhow::Ok(())
    });

    let (seen_by_inner, seen_by_outer) = outer.resume().unwrap().suspended().unwrap();
    assert_eq!(
        seen_by_inner,
        View {
            tenant: Some("outer"),
            span_depth: 1
        }
    );
    assert_eq!(
        seen_by_outer,
        View {
            tenant: Some("outer"),
            span_depth: 0
        }
    );
    assert_eq!(tenant.level(), 0);
    assert_eq!(span.level(), 0);
}

#[test]
fn test_inner_computation_outlives_its_creator() {
    let tenant: ContextStack<&'static str> = ContextStack::new("outliving");

    let t = tenant.clone();
    let mut outer = Resumable::new(move |_co: Co<()>| async move {
        let _tenant = t.enter()?;
        t.set_value("creator");

        let ti = t.clone();
        let inner = Resumable::new(move |co: Co<Vec<Option<&'static str>>>| async move {
            co.suspend(ti.get_stack()).await;
            anyhow::Ok(())
        });
        anyhow::Ok(inner)
    });

    let mut inner = outer.resume().unwrap().completed().unwrap();
    assert!(outer.is_finished());

    let seen = tenant
        .scope("root caller", || inner.resume().unwrap().suspended())
        .unwrap();
    assert_eq!(seen, Some(vec![Some("creator")]));
}

#[test]
fn test_inner_resumed_from_different_outer_states() {
    let depth: ContextStack<u32> = ContextStack::new("nested-depth");

    let d = depth.clone();
    let mut outer = Resumable::new(move |co: Co<Vec<Option<u32>>>| async move {
        let di = d.clone();
        let mut inner = Resumable::new(move |co: Co<Vec<Option<u32>>>| async move {
            for _ in 0..4 {
                co.suspend(di.get_stack()).await;
            }
            anyhow::Ok(())
        });

        let first = d
            .scope(10, || inner.resume().map(|outcome| outcome.suspended()))??;
        co.suspend(first.unwrap_or_default()).await;

        let second = d
            .scope(20, || inner.resume().map(|outcome| outcome.suspended()))??;
        co.suspend(second.unwrap_or_default()).await;
        anyhow::Ok(())
    });

    assert_eq!(outer.resume().unwrap().suspended(), Some(vec![Some(10)]));
    assert_eq!(outer.resume().unwrap().suspended(), Some(vec![Some(20)]));
    assert!(outer.resume().unwrap().completed().is_some());
}

#[test]
fn test_cancelling_creator_tears_down_held_computation() {
    let tenant: ContextStack<&'static str> = ContextStack::new("held-tenant");
    let span: ContextStack<u32> = ContextStack::new("held-span");

    let (t, s) = (tenant.clone(), span.clone());
    let mut outer = Resumable::new(move |co: Co<()>| async move {
        let _tenant = t.enter()?;
        let si = s.clone();
        let mut inner = Resumable::new(move |co: Co<()>| async move {
            let _span = si.enter()?;
            co.suspend(()).await;
            anyhow::Ok(())
        });
        inner.resume()?;
        co.suspend(()).await;
        drop(inner);
        anyhow::Ok(())
    });

    outer.resume().unwrap();
    let report = outer.cancel();

    // The held computation reports to its own teardown, not the creator's.
    assert!(report.is_clean());
    assert_eq!(report.exited.len(), 1);
    assert_eq!(report.exited[0].family, *tenant.family());
    assert_eq!(tenant.level(), 0);
    assert_eq!(span.level(), 0);
}
