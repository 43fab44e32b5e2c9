use chirpy_core::{
    JsonRepository, PostId, PostListQuery, PostRepository, StoreConfig, UserId, UserRepository,
};
use std::collections::BTreeSet;
use std::thread;

const WORKERS: u64 = 8;
const POSTS_PER_WORKER: u64 = 12;

#[test]
fn concurrent_creates_get_unique_sequential_ids() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonRepository::open(&StoreConfig::new(dir.path().join("database.json"))).unwrap();

    let assigned: Vec<PostId> = thread::scope(|scope| {
        let handles: Vec<_> = (0..WORKERS)
            .map(|worker| {
                let repo = &repo;
                scope.spawn(move || {
                    (0..POSTS_PER_WORKER)
                        .map(|n| {
                            repo.create_post(&format!("worker {worker} post {n}"), UserId(worker + 1))
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    });

    let total = WORKERS * POSTS_PER_WORKER;
    let unique: BTreeSet<u64> = assigned.iter().map(|id| id.0).collect();
    assert_eq!(unique.len() as u64, total);
    assert_eq!(unique, (1..=total).collect::<BTreeSet<_>>());

    let stored = repo.list_posts(&PostListQuery::default()).unwrap();
    assert_eq!(stored.len() as u64, total);
    for worker in 0..WORKERS {
        let mine = repo
            .list_posts(&PostListQuery {
                author_id: Some(UserId(worker + 1)),
                ..PostListQuery::default()
            })
            .unwrap();
        assert_eq!(mine.len() as u64, POSTS_PER_WORKER);
    }
}

#[test]
fn concurrent_readers_and_writers_lose_no_updates() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonRepository::open(&StoreConfig::new(dir.path().join("database.json"))).unwrap();

    thread::scope(|scope| {
        for worker in 0..WORKERS {
            let repo = &repo;
            scope.spawn(move || {
                repo.create_user(&format!("user{worker}@example.com"), vec![worker as u8])
                    .unwrap();
            });
            scope.spawn(move || {
                for _ in 0..POSTS_PER_WORKER {
                    repo.list_posts(&PostListQuery::default()).unwrap();
                }
            });
        }
    });

    let summary = repo.summary().unwrap();
    assert_eq!(summary.users as u64, WORKERS);
    for id in 1..=WORKERS {
        assert!(repo.get_user(UserId(id)).unwrap().is_some());
    }
}
