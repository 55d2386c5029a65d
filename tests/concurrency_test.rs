//! Test that independent profiles can run concurrently.

use std::hint::black_box;
use std::thread;

use complexity_oracle::{generators, ComplexityProfiler, ResilientRunner, WorkItem};

fn checksum_item(seed: u8) -> WorkItem<Vec<u8>> {
    WorkItem::new(
        format!("checksum-{seed}"),
        move |n| vec![seed; n],
        |bytes: &Vec<u8>| {
            let mut acc = 0u32;
            for byte in bytes {
                acc = acc.wrapping_mul(31).wrapping_add(*byte as u32);
            }
            black_box(acc)
        },
    )
}

#[test]
fn library_is_thread_safe() {
    // Spawn 4 threads, each running its own profiler
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            thread::spawn(move || {
                let item = checksum_item(i);
                let result = ComplexityProfiler::quick().profile(&item).unwrap();
                result.name == item.name() && result.ranked_fits.len() == 7
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn library_works_with_many_sequential_calls() {
    let profiler = ComplexityProfiler::quick();
    for i in 0..10u8 {
        let result = profiler.profile(&checksum_item(i)).unwrap();
        assert_eq!(result.metadata.sample_count, 5 * 3);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_runs_are_independent() {
    let profiler = ComplexityProfiler::quick();
    let runner = ResilientRunner::new();

    let a = checksum_item(1);
    let b = WorkItem::new("identity", generators::identity, |n: &usize| black_box(*n));

    let (first, second) = tokio::join!(
        runner.run_profile(&profiler, &a),
        runner.run_profile(&profiler, &b)
    );
    assert_eq!(first.unwrap().value.name, "checksum-1");
    assert_eq!(second.unwrap().value.name, "identity");
}

#[tokio::test]
async fn batch_skips_failures_and_continues() {
    let items = vec![
        WorkItem::fallible("ok", generators::identity, |n: &usize| Ok::<_, String>(*n)),
        WorkItem::fallible("bad", generators::identity, |_: &usize| {
            Err::<usize, _>("broken".to_string())
        }),
        WorkItem::fallible("also ok", generators::identity, |n: &usize| Ok::<_, String>(n + 1)),
    ];

    let outcomes = ResilientRunner::new()
        .attempts(2)
        .run_batch(&ComplexityProfiler::quick(), &items)
        .await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].is_ok());
    assert_eq!(outcomes[1].as_ref().unwrap_err().attempts(), 2);
    assert_eq!(outcomes[2].as_ref().unwrap().value.name, "also ok");
}
