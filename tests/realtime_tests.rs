// SPDX-License-Identifier: MIT

//! Registry and dispatcher behavior under concurrency.

use std::collections::HashSet;
use std::sync::Arc;

use taskboard::models::UserId;
use taskboard::realtime::{Dispatcher, Event, SessionRegistry};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_connect_disconnect_leaves_clean_registry() {
    let registry = Arc::new(SessionRegistry::new());
    let users: Vec<UserId> = (0..8).map(|_| UserId::new()).collect();

    let mut handles = Vec::new();
    for &user in &users {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..50 {
                let (conn, mut rx) = registry.register(user);
                registry.send_to_user(user, "tick");
                assert_eq!(rx.try_recv().unwrap(), "tick");
                registry.unregister(user, conn);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(registry.connected_users(), 0);
    for user in users {
        assert_eq!(registry.connection_count(user), 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_dispatch_delivers_every_event() {
    let registry = Arc::new(SessionRegistry::new());
    let dispatcher = Dispatcher::new(registry.clone());
    let recipient = UserId::new();
    let (_c1, mut rx1) = registry.register(recipient);
    let (_c2, mut rx2) = registry.register(recipient);

    let writers = 4;
    let events_per_writer = 100;
    let mut handles = Vec::new();
    for _ in 0..writers {
        let dispatcher = dispatcher.clone();
        handles.push(tokio::spawn(async move {
            let recipients = HashSet::from([recipient]);
            for _ in 0..events_per_writer {
                dispatcher.dispatch(&Event::FriendsUpdated, &recipients);
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // Both sessions see every event exactly once
    for rx in [&mut rx1, &mut rx2] {
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, writers * events_per_writer);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dispatch_during_churn_never_panics() {
    let registry = Arc::new(SessionRegistry::new());
    let dispatcher = Dispatcher::new(registry.clone());
    let user = UserId::new();

    // One task churns sessions while another dispatches at it.
    let churner = {
        let registry = registry.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let (conn, rx) = registry.register(user);
                drop(rx);
                registry.unregister(user, conn);
                tokio::task::yield_now().await;
            }
        })
    };
    let sender = tokio::spawn(async move {
        let recipients = HashSet::from([user]);
        for _ in 0..200 {
            dispatcher.dispatch(&Event::DataUpdated, &recipients);
            tokio::task::yield_now().await;
        }
    });

    churner.await.unwrap();
    sender.await.unwrap();
    assert_eq!(registry.connection_count(user), 0);
}
