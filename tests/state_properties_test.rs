//! Property tests for the invariants every primitive keeps.

use panel_state::state::{is_sentinel, AsyncOperation, AsyncStatus, FilterSet, PageUpdate, Paginator};
use proptest::prelude::*;
use serde_json::{json, Value};

fn filter_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(json!("")),
        Just(json!("all")),
        "[a-z]{1,8}".prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

#[derive(Clone)]
enum PageOp {
    Set(i64),
    Next,
    Prev,
    Total(u64),
    Response(Option<u64>, Option<u64>),
}

fn page_op() -> impl Strategy<Value = PageOp> {
    prop_oneof![
        any::<i64>().prop_map(PageOp::Set),
        Just(PageOp::Next),
        Just(PageOp::Prev),
        (0u64..10_000).prop_map(PageOp::Total),
        (proptest::option::of(0u64..10_000), proptest::option::of(0u64..1_000))
            .prop_map(|(total, page)| PageOp::Response(total, page)),
    ]
}

impl std::fmt::Debug for PageOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageOp::Set(page) => write!(f, "set_page({})", page),
            PageOp::Next => write!(f, "next_page"),
            PageOp::Prev => write!(f, "prev_page"),
            PageOp::Total(total) => write!(f, "set_total({})", total),
            PageOp::Response(total, page) => write!(f, "update({:?}, {:?})", total, page),
        }
    }
}

proptest! {
    #[test]
    fn prop_set_page_stays_in_range(total in 0u64..100_000, page_size in 1u64..500, page in any::<i64>()) {
        let mut paginator = Paginator::new(page_size);
        paginator.set_total(total);
        paginator.set_page(page);

        prop_assert!(paginator.page() >= 1);
        prop_assert!(paginator.page() <= paginator.total_pages());
        prop_assert_eq!(paginator.total_pages(), total.div_ceil(page_size).max(1));
    }

    #[test]
    fn prop_page_in_range_after_any_mutation(page_size in 1u64..100, ops in proptest::collection::vec(page_op(), 0..40)) {
        let mut paginator = Paginator::new(page_size);
        for op in ops {
            match op {
                PageOp::Set(page) => paginator.set_page(page),
                PageOp::Next => paginator.next_page(),
                PageOp::Prev => paginator.prev_page(),
                PageOp::Total(total) => paginator.set_total(total),
                PageOp::Response(total, page) => paginator.update_from_response(PageUpdate { total, page }),
            }
            prop_assert!((1..=paginator.total_pages()).contains(&paginator.page()));
        }
    }

    #[test]
    fn prop_projections_never_overflow(total in any::<u64>(), first_size in 1u64..1_000, page in any::<i64>(), page_size in any::<u64>()) {
        let mut paginator = Paginator::new(first_size);
        paginator.set_total(total);
        paginator.set_page(page);
        paginator.set_page_size(page_size);

        let params = paginator.params();
        prop_assert_eq!(params.page, paginator.page());
        if let Some((first, last)) = paginator.item_range() {
            prop_assert!(first <= last && last <= total);
        }
    }

    #[test]
    fn prop_filter_empty_iff_no_active(entries in proptest::collection::vec(("[a-d]", filter_value()), 0..12)) {
        let filters = FilterSet::from_pairs(entries);

        prop_assert_eq!(filters.is_empty(), filters.active_count() == 0);
        prop_assert_eq!(filters.to_query_params().len(), filters.active_count());
        prop_assert!(filters.to_query_params().values().all(|v| !is_sentinel(v)));
    }

    #[test]
    fn prop_all_sentinel_filters_project_to_nothing(keys in proptest::collection::vec("[a-z]{1,6}", 0..8)) {
        let filters = FilterSet::from_pairs(keys.into_iter().map(|k| (k, json!("all"))));
        prop_assert!(filters.to_query_params().is_empty());
        prop_assert!(filters.is_empty());
    }

    #[test]
    fn prop_settled_operation_has_exactly_one_outcome(inputs in proptest::collection::vec(any::<i32>(), 1..20)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let op = AsyncOperation::new(|n: i32| async move {
                if n % 2 == 0 { Ok(n) } else { Err(format!("odd: {}", n)) }
            });

            for n in inputs {
                let _ = op.execute(n).await;
                let snapshot = op.snapshot();
                match snapshot.status {
                    AsyncStatus::Success => {
                        assert!(snapshot.value.is_some() && snapshot.error.is_none());
                    }
                    AsyncStatus::Error => {
                        assert!(snapshot.value.is_none() && snapshot.error.is_some());
                    }
                    other => panic!("unsettled status {:?}", other),
                }
            }

            op.reset();
            assert!(op.is_idle());
            assert_eq!(op.value(), None);
            assert_eq!(op.error(), None);
        });
    }
}
