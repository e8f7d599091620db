// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Chatter: announces a name and publishes a short series of messages.
//!
//! One session is `open` -> `run` -> `close`:
//!
//! 1. `open` creates the participant, both topics (reliable, the name
//!    topic also transient), a publisher in the chat partition and two
//!    writers, printing the QoS it chose along the way.
//! 2. `run` writes the name record, a greeting (index 0) and, unless the
//!    sender is [`TERMINATION_MESSAGE`], [`NUM_MSG`] numbered messages
//!    paced by the send interval. It then disposes and unregisters the
//!    message instance and unregisters the name record.
//! 3. `close` deletes writers, publisher, topics and participant in that
//!    order.

use crate::config::ChatSettings;
use crate::error::{ChatResult, OpExt};
use crate::qos_print::{print_qos, QosScope};
use crate::types::{ChatMessage, NameService};
use crate::{CHAT_MESSAGE_TOPIC, NAME_SERVICE_TOPIC, TERMINATION_MESSAGE};
use chatdds::{DataWriter, InstanceHandle, Participant, Publisher, Topic, WriterStats};
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Number of numbered messages after the greeting.
pub const NUM_MSG: i32 = 10;

/// Display name used when none is given.
pub fn default_name(user_id: i32) -> String {
    format!("Chatter {}", user_id)
}

/// Content of the index-0 message.
pub fn greeting(user_id: i32) -> String {
    if user_id == TERMINATION_MESSAGE {
        "Termination message.".to_string()
    } else {
        format!("Hi there, I will send you {} more messages.", NUM_MSG)
    }
}

/// Content of numbered message `index`.
pub fn message_content(index: i32) -> String {
    format!("Message no. {}", index)
}

/// What a run emitted, per writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatterReport {
    pub messages: WriterStats,
    pub names: WriterStats,
}

pub struct Chatter {
    user_id: i32,
    name: String,
    send_interval: Duration,
    participant: Arc<Participant>,
    chat_topic: Topic<ChatMessage>,
    name_topic: Topic<NameService>,
    publisher: Publisher,
    talker: DataWriter<ChatMessage>,
    name_server: DataWriter<NameService>,
}

impl Chatter {
    /// Create every entity the chatter needs.
    pub fn open(
        settings: &ChatSettings,
        user_id: i32,
        name: Option<String>,
        out: &mut dyn Write,
    ) -> ChatResult<Self> {
        settings.validate()?;
        let name = name.unwrap_or_else(|| default_name(user_id));

        let participant = Participant::builder(&format!("chatter-{}", user_id))
            .domain_id(settings.domain_id)
            .with_transport(settings.transport)
            .build()
            .op("DDS::DomainParticipantFactory::create_participant")?;

        let topic_qos = participant.get_default_topic_qos();
        print_qos(out, QosScope::Topic, "default topic", &topic_qos)?;
        let topic_qos = topic_qos.reliable_kind();
        print_qos(out, QosScope::Topic, "reliable topic", &topic_qos)?;
        participant
            .set_default_topic_qos(topic_qos.clone())
            .op("DDS::DomainParticipant::set_default_topic_qos")?;

        let chat_topic = participant
            .create_topic::<ChatMessage>(CHAT_MESSAGE_TOPIC, topic_qos)
            .op("DDS::DomainParticipant::create_topic (ChatMessage)")?;

        let name_topic_qos = participant.get_default_topic_qos().transient();
        let name_topic = participant
            .create_topic::<NameService>(NAME_SERVICE_TOPIC, name_topic_qos)
            .op("DDS::DomainParticipant::create_topic (NameService)")?;

        let publisher_qos = participant
            .get_default_publisher_qos()
            .partition_single(&settings.partition);
        let publisher = participant
            .create_publisher(publisher_qos)
            .op("DDS::DomainParticipant::create_publisher")?;

        let talker = publisher
            .create_writer_with_topic_qos(&chat_topic)
            .op("DDS::Publisher::create_datawriter (chatMessage)")?;

        // The name record outlives its writer's unregister: no autodispose.
        let name_writer_qos = publisher
            .get_default_writer_qos()
            .copy_from_topic_qos(name_topic.qos())
            .autodispose_unregistered(false);
        writeln!(out, "Data Writer QOS: ")?;
        print_qos(out, QosScope::DataWriter, "NameService writer", &name_writer_qos)?;
        let name_server = publisher
            .create_writer(&name_topic, name_writer_qos)
            .op("DDS::Publisher::create_datawriter (NameService)")?;

        tracing::info!(
            user_id,
            name = %name,
            domain = settings.domain_id,
            partition = %settings.partition,
            "chatter ready"
        );

        Ok(Self {
            user_id,
            name,
            send_interval: settings.send_interval,
            participant,
            chat_topic,
            name_topic,
            publisher,
            talker,
            name_server,
        })
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publish this chatter's name record.
    ///
    /// The name topic is transient: boards that start later still get it.
    pub fn announce(&self) -> ChatResult<NameService> {
        let record = NameService::new(self.user_id, self.name.clone());
        self.name_server
            .write(&record)
            .op("Chat::NameServiceDataWriter::write")?;
        Ok(record)
    }

    /// Publish the name record and the message series, then withdraw both.
    pub fn run(&self, out: &mut dyn Write) -> ChatResult<ChatterReport> {
        let record = self.announce()?;

        let mut msg = ChatMessage::new(self.user_id, 0, greeting(self.user_id));
        writeln!(out, "Writing message: \"{}\"", msg.content)?;
        let handle = self
            .talker
            .register_instance(&msg)
            .op("Chat::ChatMessageDataWriter::register_instance")?;
        self.talker
            .write_w_handle(&msg, handle)
            .op("Chat::ChatMessageDataWriter::write")?;
        thread::sleep(self.send_interval);

        if self.user_id != TERMINATION_MESSAGE {
            for index in 1..=NUM_MSG {
                writeln!(out, "Current time: {}", self.participant.current_time())?;
                msg.index = index;
                msg.content = message_content(index);
                writeln!(out, "Writing message: \"{}\"", msg.content)?;
                self.talker
                    .write_w_handle(&msg, handle)
                    .op("Chat::ChatMessageDataWriter::write")?;
                tracing::debug!(index, "message sent");
                thread::sleep(self.send_interval);
            }
        }

        self.talker
            .dispose(&msg, handle)
            .op("Chat::ChatMessageDataWriter::dispose")?;
        self.talker
            .unregister_instance(&msg, handle)
            .op("Chat::ChatMessageDataWriter::unregister_instance")?;
        self.name_server
            .unregister_instance(&record, InstanceHandle::nil())
            .op("Chat::NameServiceDataWriter::unregister_instance")?;

        Ok(ChatterReport {
            messages: self.talker.stats(),
            names: self.name_server.stats(),
        })
    }

    /// Delete every entity, children first.
    pub fn close(self, out: &mut dyn Write) -> ChatResult<()> {
        let Self {
            participant,
            chat_topic,
            name_topic,
            publisher,
            talker,
            name_server,
            ..
        } = self;

        publisher
            .delete_writer(talker)
            .op("DDS::Publisher::delete_datawriter (talker)")?;
        publisher
            .delete_writer(name_server)
            .op("DDS::Publisher::delete_datawriter (nameServer)")?;
        participant
            .delete_publisher(&publisher)
            .op("DDS::DomainParticipant::delete_publisher")?;
        participant
            .delete_topic(&name_topic)
            .op("DDS::DomainParticipant::delete_topic (nameServiceTopic)")?;
        participant
            .delete_topic(&chat_topic)
            .op("DDS::DomainParticipant::delete_topic (chatMessageTopic)")?;
        participant
            .close()
            .op("DDS::DomainParticipantFactory::delete_participant")?;

        writeln!(out, "Completed chatter example.")?;
        tracing::info!("chatter closed");
        Ok(())
    }
}
