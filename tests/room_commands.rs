//! Integration tests for room settings, declarations, the Pokémon of the
//! Day and the moderation commands' visible output.

mod common;

use common::hub::{LOBBY, mod_log, popups, privates, room_lines};
use common::TestHub;
use dexchat::handlers::ACCESS_DENIED;
use dexchat::state::{HubEvent, Rank};

#[tokio::test]
async fn leader_sets_and_clears_rules() {
    let t = TestHub::new();
    let leader = t.user("Leady", Rank::Leader).await;
    let mut events = t.hub.subscribe();

    let out = t.run(&leader, "/rules https://example.org/rules").await;
    assert_eq!(
        room_lines(&out),
        ["(Leady set the room rules link to: https://example.org/rules)"]
    );
    assert_eq!(
        mod_log(&out),
        ["Leady set the room rules link to: https://example.org/rules"]
    );
    assert_eq!(
        events.recv().await.unwrap(),
        HubEvent::RoomSettingsChanged {
            room: LOBBY.to_string(),
            field: "rules",
        }
    );

    let out = t.run(&leader, "/rules").await;
    assert_eq!(privates(&out), ["Lobby room rules: https://example.org/rules"]);

    let out = t.run(&leader, "/rules remove").await;
    assert_eq!(room_lines(&out), ["(Leady removed the room rules link.)"]);
    assert!(events.recv().await.is_ok());
    let room = t.hub.room(LOBBY).unwrap();
    assert!(room.read().await.rules_link.is_none());
}

#[tokio::test]
async fn rules_change_needs_leader() {
    let t = TestHub::new();
    let moddy = t.user("Moddy", Rank::Moderator).await;
    let mut events = t.hub.subscribe();

    let out = t.run(&moddy, "/rules https://example.org/mine").await;
    assert_eq!(privates(&out), [ACCESS_DENIED]);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn declare_posts_to_the_room() {
    let t = TestHub::new();
    let leader = t.user("Leady", Rank::Leader).await;

    let out = t.run(&leader, "/declare Tournament in five minutes!").await;
    assert_eq!(
        room_lines(&out),
        ["[declaration] Tournament in five minutes!"]
    );
    assert_eq!(mod_log(&out), ["Leady declared: Tournament in five minutes!"]);

    let out = t.run(&leader, "/declare").await;
    assert_eq!(privates(&out), ["Usage: /declare [message]"]);
}

#[tokio::test]
async fn potd_updates_notify_subscribers() {
    let t = TestHub::new();
    let admin = t.user("Addy", Rank::Admin).await;
    let alice = t.user("Alice", Rank::Unranked).await;
    let mut potd = t.hub.settings.subscribe_potd();

    let out = t.run(&admin, "/potd snorlax").await;
    assert_eq!(room_lines(&out), ["The Pokémon of the Day is now Snorlax!"]);
    assert!(potd.has_changed().unwrap());
    let current = potd.borrow_and_update().clone().unwrap();
    assert_eq!(current.species, "Snorlax");
    assert_eq!(current.set_by, "Addy");

    let out = t.run(&alice, "/potd").await;
    assert_eq!(privates(&out), ["The Pokémon of the Day is Snorlax."]);

    let out = t.run(&admin, "/potd Agumon").await;
    assert_eq!(privates(&out), ["Pokémon 'Agumon' does not exist."]);
    assert!(!potd.has_changed().unwrap());

    let out = t.run(&admin, "/potd off").await;
    assert_eq!(room_lines(&out), ["The Pokémon of the Day was removed."]);
    assert!(potd.borrow_and_update().is_none());
}

#[tokio::test]
async fn warn_shows_a_popup_and_logs() {
    let t = TestHub::new();
    let driver = t.user("Dee", Rank::Driver).await;
    let alice = t.user("Alice", Rank::Unranked).await;

    let out = t.run(&driver, "/warn alice, flooding").await;
    assert_eq!(
        popups(&out),
        [(alice.as_str(), "Dee has warned you. (flooding)")]
    );
    assert_eq!(room_lines(&out), ["Alice was warned by Dee. (flooding)"]);
    assert_eq!(mod_log(&out), ["Alice was warned by Dee. (flooding)"]);
}

#[tokio::test]
async fn overlong_reason_is_rejected() {
    let t = TestHub::new();
    let driver = t.user("Dee", Rank::Driver).await;
    t.user("Alice", Rank::Unranked).await;

    let reason = "x".repeat(301);
    let out = t.run(&driver, &format!("/warn Alice, {reason}")).await;
    assert_eq!(
        privates(&out),
        ["The reason is too long. It cannot exceed 300 characters."]
    );
}

#[tokio::test]
async fn mute_and_unmute_round_trip() {
    let t = TestHub::new();
    let driver = t.user("Dee", Rank::Driver).await;
    let alice = t.user("Alice", Rank::Unranked).await;

    let out = t.run(&driver, "/m Alice").await;
    assert_eq!(room_lines(&out), ["Alice was muted by Dee for 7 minutes."]);
    let room = t.hub.room(LOBBY).unwrap();
    assert!(room.read().await.is_muted(&alice, chrono::Utc::now()));

    let out = t.run(&driver, "/um Alice").await;
    assert_eq!(room_lines(&out), ["Alice was unmuted by Dee."]);
    assert!(!room.read().await.is_muted(&alice, chrono::Utc::now()));

    let out = t.run(&driver, "/unmute Alice").await;
    assert_eq!(privates(&out), ["Alice is not muted."]);
}

#[tokio::test]
async fn hourmute_needs_moderator() {
    let t = TestHub::new();
    let driver = t.user("Dee", Rank::Driver).await;
    let moddy = t.user("Moddy", Rank::Moderator).await;
    t.user("Alice", Rank::Unranked).await;

    let out = t.run(&driver, "/hm Alice").await;
    assert_eq!(privates(&out), [ACCESS_DENIED]);

    let out = t.run(&moddy, "/hm Alice, spam").await;
    assert_eq!(room_lines(&out), ["Alice was muted by Moddy for 1 hour. (spam)"]);
}

#[tokio::test]
async fn moderation_needs_the_target_in_the_room() {
    let t = TestHub::new();
    let moddy = t.user("Moddy", Rank::Moderator).await;
    t.hub.add_user(dexchat::state::User::new("Outsider", Rank::Unranked));

    let out = t.run(&moddy, "/mute Outsider").await;
    assert_eq!(privates(&out), ["User Outsider is not in the room lobby."]);

    let out = t.run(&moddy, "/mute").await;
    assert_eq!(privates(&out), ["Usage: /mute [user], [reason]"]);
}
