// tests/sharing_tests.rs
mod common;

use common::*;
use listshare::ListError;
use std::collections::HashSet;

#[tokio::test]
async fn test_share_link_is_symmetric() {
  setup_tracing();
  let services = services();
  let alice = register(&services, "alice@example.com").await;
  let bob = register(&services, "bob@example.com").await;

  let outcome = services.identities.share_link(alice.id, "bob@example.com").await.unwrap();
  assert_eq!(outcome.partner_id, bob.id);
  assert!(outcome.newly_linked);

  let scopes = services.items.scopes();
  assert!(scopes.resolve(alice.id).await.unwrap().contains(&bob.id));
  assert!(scopes.resolve(bob.id).await.unwrap().contains(&alice.id));

  let bob_profile = services.identities.get(bob.id).await.unwrap();
  assert!(bob_profile.partners.contains(&alice.id));
}

#[tokio::test]
async fn test_share_link_is_idempotent() {
  setup_tracing();
  let services = services();
  let alice = register(&services, "alice@example.com").await;
  let bob = register(&services, "bob@example.com").await;

  services.identities.share_link(alice.id, "bob@example.com").await.unwrap();
  let after_first = (
    services.identities.get(alice.id).await.unwrap().partners,
    services.identities.get(bob.id).await.unwrap().partners,
  );

  let second = services.identities.share_link(alice.id, "bob@example.com").await.unwrap();
  assert!(!second.newly_linked);
  // Sharing back from the other side is the same edge.
  let reverse = services.identities.share_link(bob.id, "alice@example.com").await.unwrap();
  assert!(!reverse.newly_linked);

  let after_repeat = (
    services.identities.get(alice.id).await.unwrap().partners,
    services.identities.get(bob.id).await.unwrap().partners,
  );
  assert_eq!(after_first, after_repeat);
  assert_eq!(after_repeat.0.len(), 1);
}

#[tokio::test]
async fn test_partner_links_are_not_transitive() {
  setup_tracing();
  let services = services();
  let a = register(&services, "a@example.com").await;
  let b = register(&services, "b@example.com").await;
  let c = register(&services, "c@example.com").await;

  services.identities.share_link(a.id, "b@example.com").await.unwrap();
  services.identities.share_link(b.id, "c@example.com").await.unwrap();
  add_item(&services, &c, "Coffee", 120.0).await;

  let scope_a = services.items.scopes().resolve(a.id).await.unwrap();
  assert_eq!(scope_a.owners, HashSet::from([a.id, b.id]));
  assert!(!scope_a.contains(&c.id));
  assert!(names_for(&services, &a).await.is_empty());

  // B sits in the middle and sees both sides.
  assert_eq!(names_for(&services, &b).await, vec!["Coffee".to_string()]);
}

#[tokio::test]
async fn test_self_share_is_rejected_without_state_change() {
  setup_tracing();
  let services = services();
  let alice = register(&services, "alice@example.com").await;

  let result = services.identities.share_link(alice.id, "  ALICE@example.com ").await;
  assert!(matches!(result, Err(ListError::SelfShareRejected)));
  assert!(services.identities.get(alice.id).await.unwrap().partners.is_empty());
}

#[tokio::test]
async fn test_unknown_partner_email() {
  setup_tracing();
  let services = services();
  let alice = register(&services, "alice@example.com").await;

  let result = services.identities.share_link(alice.id, "nobody@example.com").await;
  assert!(matches!(result, Err(ListError::PartnerNotFound)));
}

#[tokio::test]
async fn test_emails_are_case_insensitive() {
  setup_tracing();
  let services = services();
  let alice = register(&services, " Alice@Example.COM").await;
  assert_eq!(alice.email, "alice@example.com");
  assert_eq!(alice.display_name, "alice");

  let duplicate = services
    .identities
    .register("ALICE@example.com", Some("Other"), "hash".into())
    .await;
  assert!(matches!(duplicate, Err(ListError::EmailTaken)));

  let found = services.identities.find_by_email("alice@EXAMPLE.com").await.unwrap();
  assert_eq!(found.map(|u| u.id), Some(alice.id));
}

#[tokio::test]
async fn test_scope_reflects_latest_graph() {
  setup_tracing();
  let services = services();
  let alice = register(&services, "alice@example.com").await;
  let bob = register(&services, "bob@example.com").await;

  let before = services.items.scopes().resolve(alice.id).await.unwrap();
  assert_eq!(before.owners, HashSet::from([alice.id]));

  services.identities.share_link(bob.id, "alice@example.com").await.unwrap();
  let after = services.items.scopes().resolve(alice.id).await.unwrap();
  assert_eq!(after.owners, HashSet::from([alice.id, bob.id]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_share_links_stay_symmetric() {
  setup_tracing();
  let services = services();
  let mut users = Vec::new();
  for i in 0..6 {
    users.push(register(&services, &format!("user{i}@example.com")).await);
  }

  let mut tasks = Vec::new();
  for round in 0..4 {
    for (i, user) in users.iter().enumerate() {
      for j in 0..users.len() {
        if i == j {
          continue;
        }
        let identities = services.identities.clone();
        let requester = user.id;
        let email = format!("user{j}@example.com");
        tasks.push(tokio::spawn(async move {
          identities.share_link(requester, &email).await.map(|o| (round, o))
        }));
      }
    }
  }

  let mut newly_linked = 0;
  for task in tasks {
    let (_, outcome) = task.await.unwrap().unwrap();
    if outcome.newly_linked {
      newly_linked += 1;
    }
  }
  // 6 users, 15 undirected edges, each created exactly once.
  assert_eq!(newly_linked, 15);

  for user in &users {
    let partners = services.identities.get(user.id).await.unwrap().partners;
    assert_eq!(partners.len(), users.len() - 1);
    for partner in partners {
      let other = services.identities.get(partner).await.unwrap();
      assert!(other.partners.contains(&user.id));
    }
  }
}
