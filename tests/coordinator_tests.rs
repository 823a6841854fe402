use std::time::Duration;

use hasher_lite::config::WorkerConfig;
use hasher_lite::coordinator::{Coordinator, JobId};
use hasher_lite::error::HasherError;
use hasher_lite::worker::sha512_base64;
use tokio::time::Instant;

const LATENCY: Duration = Duration::from_secs(5);

fn coordinator() -> Coordinator {
    Coordinator::new(&WorkerConfig { latency: LATENCY })
}

fn id(raw: u64) -> JobId {
    JobId::new(raw).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_alpha_beta_scenario() {
    let c = coordinator();

    assert_eq!(c.submit("alpha").await.unwrap(), id(1));
    assert_eq!(c.submit("beta").await.unwrap(), id(2));
    assert_eq!(c.submit("alpha").await.unwrap(), id(1));
    assert_eq!(c.job_count().await, 2);

    // Not ready before the delay
    let early = tokio::time::timeout(LATENCY / 2, c.retrieve(id(1))).await;
    assert!(early.is_err(), "retrieve returned before the digest was ready");

    let digest = c.retrieve(id(1)).await.unwrap();
    assert_eq!(digest, sha512_base64(b"alpha"));

    let err = c.retrieve(id(3)).await.unwrap_err();
    assert!(matches!(err, HasherError::IdOutOfRange { id: 3, jobs: 2 }));
}

#[tokio::test(start_paused = true)]
async fn test_retrieve_blocks_for_latency() {
    let c = coordinator();
    let job = c.submit("angryMonkey").await.unwrap();

    let started = Instant::now();
    let digest = c.retrieve(job).await.unwrap();

    assert!(started.elapsed() >= LATENCY);
    assert_eq!(
        digest,
        "ZEHhWB65gUlzdVwtDQArEyx+KVLzp/aTaRaPlBzYRIFj6vjFdqEb0Q5B8zVKCZ0vKbZPZklJz0Fd7su2A+gf7Q=="
    );
}

#[tokio::test(start_paused = true)]
async fn test_ready_digest_returns_immediately() {
    let c = coordinator();
    let job = c.submit("alpha").await.unwrap();
    c.retrieve(job).await.unwrap();

    let started = Instant::now();
    c.retrieve(job).await.unwrap();
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_kth_distinct_input_gets_id_k() {
    let c = coordinator();
    for k in 1..=20u64 {
        let input = format!("password-{k}");
        assert_eq!(c.submit(&input).await.unwrap(), id(k));
    }
    // Resubmitting in reverse changes nothing
    for k in (1..=20u64).rev() {
        let input = format!("password-{k}");
        assert_eq!(c.submit(&input).await.unwrap(), id(k));
    }
    assert_eq!(c.job_count().await, 20);
    assert_eq!(c.stats().await.total, 40);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_submissions_create_one_job() {
    let c = Coordinator::new(&WorkerConfig {
        latency: Duration::from_millis(50),
    });

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let c = c.clone();
            tokio::spawn(async move { c.submit("same").await.unwrap() })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), id(1));
    }
    assert_eq!(c.job_count().await, 1);
    assert_eq!(c.stats().await.total, 32);

    let digest = c.retrieve(id(1)).await.unwrap();
    assert_eq!(digest, sha512_base64(b"same"));
    assert_eq!(c.pending_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_waiters_on_different_jobs_all_wake() {
    let c = Coordinator::new(&WorkerConfig {
        latency: Duration::from_millis(50),
    });

    let mut waiters = Vec::new();
    for i in 0..8 {
        let input = format!("input-{i}");
        let job = c.submit(&input).await.unwrap();
        for _ in 0..4 {
            let c = c.clone();
            let input = input.clone();
            waiters.push(tokio::spawn(async move {
                (c.retrieve(job).await.unwrap(), input)
            }));
        }
    }

    for waiter in waiters {
        let (digest, input) = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter was never woken")
            .unwrap();
        assert_eq!(digest, sha512_base64(input.as_bytes()));
    }
}

#[tokio::test(start_paused = true)]
async fn test_stats_include_background_time() {
    let c = coordinator();

    let empty = c.stats().await;
    assert_eq!(empty.total, 0);
    assert_eq!(empty.average_millis(), 0);

    c.submit("alpha").await.unwrap();
    c.submit("beta").await.unwrap();
    c.submit("alpha").await.unwrap();
    c.retrieve(id(1)).await.unwrap();
    c.retrieve(id(2)).await.unwrap();

    let stats = c.stats().await;
    assert_eq!(stats.total, 3);
    // Two background tasks of 5s each, submissions take no paused time
    assert_eq!(stats.total_elapsed, LATENCY * 2);
    assert_eq!(stats.average_millis(), 3333);
}

#[tokio::test]
async fn test_malformed_ids_never_block() {
    let c = coordinator();
    c.submit("alpha").await.unwrap();

    for raw in ["abc", "", "1e3", "-1", "0", "2", "18446744073709551615"] {
        let result = tokio::time::timeout(Duration::from_millis(100), c.lookup(raw))
            .await
            .expect("lookup of a bad id blocked");
        assert!(result.is_err(), "expected error for {raw:?}");
    }
}
