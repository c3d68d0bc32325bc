//! Concurrent password changes for one account: the compare-and-swap write
//! lets exactly one request win.

use std::sync::Arc;

use accounts::domain::ports::{CredentialHasher, UserProfileCommand};
use accounts::domain::{AccountService, PasswordChange, PasswordChangeOutcome, PlainPassword};
use accounts::test_support::{AccountRecord, InMemoryAccountRepository, fast_hasher};
use rstest::rstest;

fn change(old: &str, new: &str) -> PasswordChange {
    PasswordChange::new(
        PlainPassword::presented(old).expect("old password"),
        PlainPassword::chosen(new).expect("new password"),
    )
}

#[rstest]
#[tokio::test]
async fn racing_changes_have_a_single_winner() {
    let hasher = Arc::new(fast_hasher().expect("hasher params"));
    let repo = Arc::new(InMemoryAccountRepository::new());
    let original = hasher
        .hash(&PlainPassword::chosen("original secret").expect("password"))
        .await
        .expect("hash");
    let record = AccountRecord::new("Ada", "ada", original.clone());
    let user_id = record.id;
    repo.insert_user(record);
    let service = AccountService::new(repo.clone(), hasher.clone());

    let first = change("original secret", "first winner");
    let second = change("original secret", "second winner");
    let (a, b) = tokio::join!(
        service.change_password(&user_id, &first),
        service.change_password(&user_id, &second),
    );

    let outcomes = [a.expect("first outcome"), b.expect("second outcome")];
    let winners = outcomes
        .iter()
        .filter(|outcome| **outcome == PasswordChangeOutcome::Changed)
        .count();
    assert_eq!(winners, 1);

    let stored = repo.user(&user_id).expect("user").password_hash;
    assert_ne!(stored, original);
    let winning = if outcomes[0] == PasswordChangeOutcome::Changed {
        "first winner"
    } else {
        "second winner"
    };
    let verified = hasher
        .verify(&PlainPassword::presented(winning).expect("password"), &stored)
        .await
        .expect("verify");
    assert!(verified);
}
