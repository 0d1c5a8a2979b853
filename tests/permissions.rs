//! Integration tests for rank checks on moderation commands.

mod common;

use common::hub::{LOBBY, mod_log, popups, privates, room_lines};
use common::TestHub;
use dexchat::handlers::ACCESS_DENIED;
use dexchat::state::{Rank, Room, User};

#[tokio::test]
async fn unranked_hourmute_on_moderator_is_denied_once() {
    let t = TestHub::new();
    let alice = t.user("Alice", Rank::Unranked).await;
    let moddy = t.user("Moddy", Rank::Moderator).await;

    let out = t.run(&alice, "/hourmute Moddy, spam").await;

    assert_eq!(out.len(), 1);
    assert_eq!(privates(&out), [ACCESS_DENIED]);
    let room = t.hub.room(LOBBY).unwrap();
    assert!(!room.read().await.is_muted(&moddy, chrono::Utc::now()));
}

#[tokio::test]
async fn equal_rank_cannot_act_on_each_other() {
    let t = TestHub::new();
    let d1 = t.user("Driver One", Rank::Driver).await;
    t.user("Driver Two", Rank::Driver).await;

    let out = t.run(&d1, "/warn Driver Two").await;
    assert_eq!(privates(&out), [ACCESS_DENIED]);
}

#[tokio::test]
async fn antisymmetric_between_ranks() {
    let t = TestHub::new();
    let moddy = t.user("Moddy", Rank::Moderator).await;
    let voicey = t.user("Voicey", Rank::Voice).await;

    let out = t.run(&moddy, "/warn Voicey, be nice").await;
    assert_eq!(popups(&out), [(voicey.as_str(), "Moddy has warned you. (be nice)")]);

    let out = t.run(&voicey, "/warn Moddy").await;
    assert_eq!(privates(&out), [ACCESS_DENIED]);
}

#[tokio::test]
async fn room_grant_cannot_raise_a_global_rank() {
    let t = TestHub::new();
    let voicey = t.user("Voicey", Rank::Voice).await;
    t.hub
        .room(LOBBY)
        .unwrap()
        .write()
        .await
        .auth
        .insert(voicey.clone(), Rank::Leader);

    let out = t.run(&voicey, "/declare hello").await;
    assert_eq!(privates(&out), [ACCESS_DENIED]);
    assert!(room_lines(&out).is_empty());
    assert!(mod_log(&out).is_empty());
}

#[tokio::test]
async fn lower_room_grant_restricts_inside_the_room_only() {
    let t = TestHub::new();
    let dee = t.user("Dee", Rank::Driver).await;
    t.user("Voicey", Rank::Voice).await;
    t.hub
        .room(LOBBY)
        .unwrap()
        .write()
        .await
        .auth
        .insert(dee.clone(), Rank::Voice);

    let out = t.run(&dee, "/mute Voicey").await;
    assert_eq!(privates(&out), [ACCESS_DENIED]);

    // Outside the room the global rank counts.
    let out = t.run_in(&dee, None, "/alts Voicey").await;
    assert_eq!(
        privates(&out),
        ["Voicey has no known alts.", "IPs of Voicey: none"]
    );
}

#[tokio::test]
async fn private_room_only_counts_room_auth() {
    let t = TestHub::new();
    let mut staff = Room::new("Staff", 10);
    staff.is_private = true;
    t.hub.add_room(staff);

    let globalmod = t.user("Globalmod", Rank::Moderator).await;
    let roommod = t.user("Roommod", Rank::Moderator).await;
    let alice = t.user("Alice", Rank::Unranked).await;
    for user in [&globalmod, &roommod, &alice] {
        assert!(t.hub.join(user, "staff").await);
    }
    t.hub
        .room("staff")
        .unwrap()
        .write()
        .await
        .auth
        .insert(roommod.clone(), Rank::Moderator);

    let out = t.run_in(&globalmod, Some("staff"), "/warn Alice").await;
    assert_eq!(privates(&out), [ACCESS_DENIED]);

    let out = t.run_in(&roommod, Some("staff"), "/warn Globalmod").await;
    assert_eq!(room_lines(&out), ["Globalmod was warned by Roommod."]);

    // The same global moderator keeps their rank in the public lobby.
    let out = t.run(&globalmod, "/warn Alice").await;
    assert_eq!(room_lines(&out), ["Alice was warned by Globalmod."]);
}

#[tokio::test]
async fn denial_comes_before_target_checks() {
    let t = TestHub::new();
    let alice = t.user("Alice", Rank::Unranked).await;
    t.hub.add_user(User::new("Moddy", Rank::Moderator));

    // The moderator never joined the lobby; membership must not leak.
    let out = t.run(&alice, "/hourmute Moddy, spam").await;
    assert_eq!(out.len(), 1);
    assert_eq!(privates(&out), [ACCESS_DENIED]);

    let reason = "x".repeat(400);
    let out = t.run(&alice, &format!("/warn Moddy, {reason}")).await;
    assert_eq!(privates(&out), [ACCESS_DENIED]);
}

#[tokio::test]
async fn owner_bypasses_rank_comparison() {
    let t = TestHub::new();
    let owner = t.user("Boss", Rank::Owner).await;
    t.user("Other Boss", Rank::Owner).await;

    let out = t.run(&owner, "/hourmute Other Boss").await;
    assert_eq!(
        room_lines(&out),
        ["Other Boss was muted by Boss for 1 hour."]
    );
    assert_eq!(mod_log(&out).len(), 1);
}

#[tokio::test]
async fn unknown_target_is_reported() {
    let t = TestHub::new();
    let moddy = t.user("Moddy", Rank::Moderator).await;

    let out = t.run(&moddy, "/mute Ghost, reason").await;
    assert_eq!(privates(&out), ["User Ghost not found."]);
}

#[tokio::test]
async fn alts_returns_addresses_as_private_line() {
    let t = TestHub::new();
    let moddy = t.user("Moddy", Rank::Moderator).await;
    let voicey = t.user("Voicey", Rank::Voice).await;
    {
        let user = t.hub.user(&voicey).unwrap();
        let mut user = user.write().await;
        user.alts.insert("voicey2".to_string());
        user.ips.push("192.0.2.7".parse().unwrap());
    }

    for line in ["/alts Voicey", "/ip Voicey", "/getip Voicey"] {
        let out = t.run(&moddy, line).await;
        assert_eq!(
            privates(&out),
            ["Alts of Voicey: voicey2", "IPs of Voicey: 192.0.2.7"],
            "{line}"
        );
    }
}
