use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use herald::server::WorkerPool;

#[test]
fn test_pool_of_zero_is_a_configuration_error() {
    let result = WorkerPool::new(0);
    assert!(result.is_err());
}

#[test]
fn test_selector_round_robin_wraps_at_pool_size() {
    let pool = WorkerPool::new(3).unwrap();
    let mut selector = pool.selector();

    let indices: Vec<usize> = (0..7).map(|_| selector.next_loop().0).collect();
    assert_eq!(indices, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn test_selector_matches_pool_size() {
    let pool = WorkerPool::new(4).unwrap();
    assert_eq!(pool.size(), 4);
    assert_eq!(pool.selector().len(), 4);
}

#[test]
fn test_fresh_selectors_start_from_zero() {
    let pool = WorkerPool::new(2).unwrap();

    let mut first = pool.selector();
    first.next_loop();
    let mut second = pool.selector();
    assert_eq!(second.next_loop().0, 0);
}

#[test]
fn test_tasks_run_on_round_robin_worker_threads() {
    let mut pool = WorkerPool::new(3).unwrap();
    let mut selector = pool.selector();
    let stop = pool.stop_handle();

    let (tx, rx) = mpsc::channel();
    for k in 0..7usize {
        let (index, handle) = selector.next_loop();
        let tx = tx.clone();
        handle.spawn(async move {
            let name = thread::current().name().map(str::to_owned);
            tx.send((k, index, name)).unwrap();
        });
    }

    let runner = thread::spawn(move || pool.run());

    let mut reports = Vec::new();
    for _ in 0..7 {
        reports.push(rx.recv_timeout(Duration::from_secs(10)).unwrap());
    }
    reports.sort_by_key(|(k, _, _)| *k);

    for (k, index, name) in reports {
        assert_eq!(index, k % 3);
        assert_eq!(name.as_deref(), Some(format!("worker-{index}").as_str()));
    }

    stop.stop();
    runner.join().unwrap().unwrap();
}

#[test]
fn test_stop_before_run_is_not_lost() {
    let mut pool = WorkerPool::new(2).unwrap();
    pool.stop();

    // the shutdown message was buffered, so run returns promptly
    pool.run().unwrap();
}

#[test]
fn test_run_twice_is_an_error() {
    let mut pool = WorkerPool::new(1).unwrap();
    let stop = pool.stop_handle();

    stop.stop();
    pool.run().unwrap();
    assert!(pool.run().is_err());
}
