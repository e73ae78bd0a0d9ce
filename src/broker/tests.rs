use super::engine::CHAT_TOPIC;
use super::topic::Topic;
use super::{Hub, Message, Subscriber, SubscriberId, Subscription};
use crate::utils::DeliveryError;
use std::sync::{Arc, Mutex};

/// In-memory subscriber that records every payload it is handed.
#[derive(Clone, Default)]
struct Recorder {
    received: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

impl Subscriber for Recorder {
    fn deliver(&self, message: &Message) -> Result<(), DeliveryError> {
        self.received
            .lock()
            .unwrap()
            .push(message.payload().to_string());
        Ok(())
    }
}

/// Subscriber whose connection is always broken.
struct Broken;

impl Subscriber for Broken {
    fn deliver(&self, _message: &Message) -> Result<(), DeliveryError> {
        Err(DeliveryError::Closed)
    }
}

struct Panicky;

impl Subscriber for Panicky {
    fn deliver(&self, _message: &Message) -> Result<(), DeliveryError> {
        panic!("subscriber blew up");
    }
}

#[test]
fn test_topic_new() {
    let topic = Topic::new("test_topic");
    assert_eq!(topic.name, "test_topic");
    assert!(topic.is_empty());
}

#[test]
fn test_hub_new() {
    let hub = Hub::new();
    assert_eq!(hub.subscriber_count(), 0);
    assert_eq!(CHAT_TOPIC, "chat");
}

#[test]
fn test_message_new() {
    let msg = Message::new("hello");
    assert_eq!(msg.payload(), "hello");
    assert!(msg.timestamp() > 0);
    assert_eq!(Message::from("").payload(), "");
}

#[test]
fn test_subscribe_and_unsubscribe() {
    let hub = Hub::new();
    let sub = hub.subscribe(Recorder::default());
    let id = sub.id();
    assert_eq!(hub.subscriber_count(), 1);
    assert!(hub.is_subscribed(id));

    assert!(hub.unsubscribe(id));
    assert_eq!(hub.subscriber_count(), 0);
    assert!(!hub.is_subscribed(id));
}

#[test]
fn test_unsubscribe_is_idempotent() {
    let hub = Hub::new();
    let recorder = Recorder::default();
    let sub = hub.subscribe(recorder.clone());
    let id = sub.id();

    assert!(hub.unsubscribe(id));
    assert!(!hub.unsubscribe(id));
    assert!(!sub.cancel());
    assert_eq!(hub.subscriber_count(), 0);

    hub.publish(Message::new("after"));
    assert!(recorder.received().is_empty());
}

#[test]
fn test_unsubscribe_unknown_id_is_noop() {
    let hub = Hub::new();
    let _sub = hub.subscribe(Recorder::default());
    assert!(!hub.unsubscribe(SubscriberId(999)));
    assert_eq!(hub.subscriber_count(), 1);
}

#[test]
fn test_dropping_subscription_unsubscribes() {
    let hub = Hub::new();
    let recorder = Recorder::default();
    {
        let _sub = hub.subscribe(recorder.clone());
        assert_eq!(hub.subscriber_count(), 1);
    }
    assert_eq!(hub.subscriber_count(), 0);

    hub.publish(Message::new("missed"));
    assert!(recorder.received().is_empty());
}

#[test]
fn test_cancel_reports_removal() {
    let hub = Hub::new();
    let sub = hub.subscribe(Recorder::default());
    assert!(sub.cancel());
    assert_eq!(hub.subscriber_count(), 0);
}

#[test]
fn test_subscription_outliving_hub() {
    let hub = Hub::new();
    let sub = hub.subscribe(Recorder::default());
    drop(hub);
    // The registry is gone with the hub; releasing must not panic.
    assert!(!sub.cancel());
}

#[test]
fn test_publish_reaches_every_subscriber_once() {
    let hub = Hub::new();
    let a = Recorder::default();
    let b = Recorder::default();
    let _sa = hub.subscribe(a.clone());
    let _sb = hub.subscribe(b.clone());

    assert_eq!(hub.publish(Message::new("hello")), 2);

    assert_eq!(a.received(), vec!["hello"]);
    assert_eq!(b.received(), vec!["hello"]);
}

#[test]
fn test_publish_with_no_subscribers() {
    let hub = Hub::new();
    assert_eq!(hub.publish(Message::new("")), 0);
    assert_eq!(hub.subscriber_count(), 0);
}

#[test]
fn test_publish_empty_message_is_delivered() {
    let hub = Hub::new();
    let recorder = Recorder::default();
    let _sub = hub.subscribe(recorder.clone());

    hub.publish(Message::new(""));
    assert_eq!(recorder.received(), vec![""]);
}

#[test]
fn test_unsubscribed_before_publish_receives_nothing() {
    let hub = Hub::new();
    let early = Recorder::default();
    let stays = Recorder::default();
    let s1 = hub.subscribe(early.clone());
    let _s2 = hub.subscribe(stays.clone());

    hub.publish(Message::new("x"));
    s1.cancel();
    hub.publish(Message::new("y"));

    assert_eq!(early.received(), vec!["x"]);
    assert_eq!(stays.received(), vec!["x", "y"]);
}

#[test]
fn test_fan_out_follows_registration_order() {
    let hub = Hub::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut subs = Vec::new();
    for n in 0..5 {
        let order = order.clone();
        subs.push(hub.subscribe(move |_: &Message| -> Result<(), DeliveryError> {
            order.lock().unwrap().push(n);
            Ok(())
        }));
    }

    hub.publish(Message::new("tick"));
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_burst_preserves_publish_order() {
    let hub = Hub::new();
    let recorder = Recorder::default();
    let _sub = hub.subscribe(recorder.clone());

    let expected: Vec<String> = (0..1000).map(|n| n.to_string()).collect();
    for payload in &expected {
        hub.publish(Message::new(payload.as_str()));
    }

    assert_eq!(recorder.received(), expected);
}

#[test]
fn test_failing_subscriber_is_isolated_and_removed() {
    let hub = Hub::new();
    let before = Recorder::default();
    let after = Recorder::default();
    let _s1 = hub.subscribe(before.clone());
    let broken = hub.subscribe(Broken);
    let _s3 = hub.subscribe(after.clone());

    assert_eq!(hub.publish(Message::new("x")), 2);
    assert_eq!(before.received(), vec!["x"]);
    assert_eq!(after.received(), vec!["x"]);

    // A failed write counts as a disconnect.
    assert!(!hub.is_subscribed(broken.id()));
    assert_eq!(hub.subscriber_count(), 2);
    // Releasing the handle afterwards is a harmless no-op.
    assert!(!broken.cancel());
}

#[test]
fn test_panicking_subscriber_is_isolated_and_removed() {
    let hub = Hub::new();
    let recorder = Recorder::default();
    let panicky = hub.subscribe(Panicky);
    let _sub = hub.subscribe(recorder.clone());

    assert_eq!(hub.publish(Message::new("first")), 1);
    assert!(!hub.is_subscribed(panicky.id()));

    hub.publish(Message::new("second"));
    assert_eq!(recorder.received(), vec!["first", "second"]);
}

#[test]
fn test_subscriber_added_during_fan_out_misses_current_message() {
    let hub = Hub::new();
    let late = Recorder::default();
    let added: Arc<Mutex<Vec<Subscription>>> = Arc::default();

    let _trigger = {
        let hub = hub.clone();
        let late = late.clone();
        let added = added.clone();
        hub.clone().subscribe(move |_: &Message| -> Result<(), DeliveryError> {
            let mut added = added.lock().unwrap();
            if added.is_empty() {
                added.push(hub.subscribe(late.clone()));
            }
            Ok(())
        })
    };

    hub.publish(Message::new("first"));
    assert!(late.received().is_empty());

    hub.publish(Message::new("second"));
    assert_eq!(late.received(), vec!["second"]);
}

#[test]
fn test_subscriber_removed_during_fan_out_is_skipped() {
    let hub = Hub::new();
    let victim_id: Arc<Mutex<Option<SubscriberId>>> = Arc::default();
    let victim = Recorder::default();

    let _remover = {
        let hub = hub.clone();
        let victim_id = victim_id.clone();
        hub.clone().subscribe(move |_: &Message| -> Result<(), DeliveryError> {
            if let Some(id) = *victim_id.lock().unwrap() {
                hub.unsubscribe(id);
            }
            Ok(())
        })
    };
    let victim_sub = hub.subscribe(victim.clone());
    *victim_id.lock().unwrap() = Some(victim_sub.id());

    assert_eq!(hub.publish(Message::new("x")), 1);
    assert!(victim.received().is_empty());
    assert!(!hub.is_subscribed(victim_sub.id()));
}

#[test]
fn test_concurrent_publishers_share_one_order() {
    let hub = Hub::new();
    let a = Recorder::default();
    let b = Recorder::default();
    let _sa = hub.subscribe(a.clone());
    let _sb = hub.subscribe(b.clone());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let hub = hub.clone();
            std::thread::spawn(move || {
                for n in 0..250 {
                    hub.publish(Message::new(format!("{t}-{n}")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let seen_a = a.received();
    assert_eq!(seen_a.len(), 1000);
    assert_eq!(seen_a, b.received());
}
