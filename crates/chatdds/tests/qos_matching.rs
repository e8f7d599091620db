// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! Request-vs-offered QoS matching through the public API

mod common;

use chatdds::qos::Partition;
use chatdds::QoS;
use common::{participant, OtherReading, Reading};

fn delivered(domain: u32, writer_qos: QoS, reader_qos: QoS) -> usize {
    let p = participant("match", domain);
    let topic = p
        .create_topic::<Reading>("readings", QoS::default())
        .expect("topic");
    let publisher = p.create_publisher(QoS::default()).expect("publisher");
    let subscriber = p.create_subscriber(QoS::default()).expect("subscriber");
    let reader = subscriber
        .create_reader(&topic, reader_qos)
        .expect("reader");
    let writer = publisher
        .create_writer(&topic, writer_qos)
        .expect("writer");
    writer.write(&Reading::new(1, 1)).expect("write");
    reader.take_batch(usize::MAX).expect("take").len()
}

#[test]
fn test_reliable_writer_serves_best_effort_reader() {
    assert_eq!(delivered(180, QoS::reliable(), QoS::best_effort()), 1);
}

#[test]
fn test_best_effort_writer_does_not_serve_reliable_reader() {
    assert_eq!(delivered(181, QoS::best_effort(), QoS::reliable()), 0);
}

#[test]
fn test_volatile_writer_does_not_serve_durable_reader() {
    assert_eq!(
        delivered(182, QoS::reliable(), QoS::reliable().transient_local()),
        0
    );
    assert_eq!(
        delivered(183, QoS::reliable().transient(), QoS::reliable()),
        1
    );
}

#[test]
fn test_partitions_must_intersect() {
    assert_eq!(
        delivered(
            184,
            QoS::reliable().partition_single("A"),
            QoS::reliable().partition_single("B")
        ),
        0
    );
    assert_eq!(
        delivered(
            185,
            QoS::reliable().partition(Partition::new(vec!["A".into(), "B".into()])),
            QoS::reliable().partition_single("B")
        ),
        1
    );
}

#[test]
fn test_endpoints_inherit_publisher_and_subscriber_partition() {
    let p = participant("inherit", 186);
    let topic = p
        .create_topic::<Reading>("readings", QoS::reliable())
        .expect("topic");
    let publisher = p
        .create_publisher(QoS::default().partition_single("ChatRoom"))
        .expect("publisher");
    let in_room = p
        .create_subscriber(QoS::default().partition_single("ChatRoom"))
        .expect("subscriber");
    let outside = p.create_subscriber(QoS::default()).expect("subscriber");

    let writer = publisher
        .create_writer_with_topic_qos(&topic)
        .expect("writer");
    assert_eq!(writer.qos().partition, Partition::single("ChatRoom"));
    let member = in_room
        .create_reader_with_topic_qos(&topic)
        .expect("reader");
    let stranger = outside
        .create_reader_with_topic_qos(&topic)
        .expect("reader");

    writer.write(&Reading::new(1, 1)).expect("write");
    assert_eq!(member.take_batch(10).expect("take").len(), 1);
    assert_eq!(stranger.take_batch(10).expect("take").len(), 0);
}

#[test]
fn test_same_topic_name_with_other_type_does_not_match() {
    let a = participant("type-a", 187);
    let b = participant("type-b", 187);
    let topic_a = a
        .create_topic::<Reading>("shared", QoS::reliable())
        .expect("topic");
    let topic_b = b
        .create_topic::<OtherReading>("shared", QoS::reliable())
        .expect("topic");
    let writer = a
        .create_publisher(QoS::default())
        .expect("publisher")
        .create_writer_with_topic_qos(&topic_a)
        .expect("writer");
    let subscriber_b = b.create_subscriber(QoS::default()).expect("subscriber");
    let reader = subscriber_b
        .create_reader_with_topic_qos(&topic_b)
        .expect("reader");
    let subscriber_a = a.create_subscriber(QoS::default()).expect("subscriber");
    let same_type = subscriber_a
        .create_reader_with_topic_qos(&topic_a)
        .expect("reader");

    writer.write(&Reading::new(1, 1)).expect("write");
    assert!(reader.take().expect("take").is_none());
    assert_eq!(same_type.take().expect("take").map(|r| r.value), Some(1));
}

#[test]
fn test_invalid_qos_is_rejected_at_creation() {
    let p = participant("invalid", 188);
    assert!(matches!(
        p.create_topic::<Reading>("readings", QoS::reliable().keep_last(0)),
        Err(chatdds::Error::InvalidQos)
    ));
    let topic = p
        .create_topic::<Reading>("readings", QoS::reliable())
        .expect("topic");
    let publisher = p.create_publisher(QoS::default()).expect("publisher");
    assert!(matches!(
        publisher.create_writer(&topic, QoS::reliable().max_samples(0)),
        Err(chatdds::Error::InvalidQos)
    ));
    assert_eq!(publisher.writer_count(), 0);
}
