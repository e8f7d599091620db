// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! MessageBoard: prints chat messages until told to close.
//!
//! The board subscribes to `Chat_ChatMessage` with a best-effort topic
//! QoS and to `Chat_NameService` with a reliable, transient one, so names
//! announced before the board started are still reported. Instead of a
//! fixed sleep the loop blocks on a [`WaitSet`] holding both readers'
//! status conditions and a stop [`GuardCondition`]; the poll interval only
//! bounds each wait.
//!
//! A message from sender [`TERMINATION_MESSAGE`] ends the loop once the
//! current batch has been printed.

use crate::config::ChatSettings;
use crate::error::{ChatError, ChatResult, OpExt};
use crate::qos_print::{print_qos, QosScope};
use crate::types::{ChatMessage, NameService};
use crate::{CHAT_MESSAGE_TOPIC, NAME_SERVICE_TOPIC, TERMINATION_MESSAGE};
use chatdds::{
    Condition, DataReader, GuardCondition, InstanceHandle, InstanceStateMask, Participant,
    SampleStateMask, Subscriber, Topic, ViewStateMask, WaitSet,
};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Why [`MessageBoard::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOutcome {
    /// A termination message arrived.
    Terminated,
    /// The stop guard was triggered (Ctrl-C).
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardReport {
    pub outcome: BoardOutcome,
    /// Chat messages printed (the termination message excluded).
    pub messages_shown: usize,
    pub joins: usize,
    pub departures: usize,
}

enum BoardEvent {
    Joined(InstanceHandle, NameService),
    Left(InstanceHandle),
    Message(ChatMessage),
}

pub struct MessageBoard {
    ignored_user: Option<i32>,
    poll_interval: Duration,
    participant: Arc<Participant>,
    chat_topic: Topic<ChatMessage>,
    name_topic: Topic<NameService>,
    subscriber: Subscriber,
    chat_reader: DataReader<ChatMessage>,
    name_reader: DataReader<NameService>,
    names: HashMap<InstanceHandle, NameService>,
}

impl MessageBoard {
    /// Create the board's entities and print its QoS and opening banner.
    ///
    /// `ignored_user` is kept for the command line's sake; messages from
    /// that sender are still shown.
    pub fn open(
        settings: &ChatSettings,
        ignored_user: Option<i32>,
        out: &mut dyn Write,
    ) -> ChatResult<Self> {
        settings.validate()?;
        if let Some(user_id) = ignored_user {
            tracing::warn!(
                user_id,
                "ignored sender id accepted but not applied; its messages are still shown"
            );
        }

        let participant = Participant::builder("messageboard")
            .domain_id(settings.domain_id)
            .with_transport(settings.transport)
            .build()
            .op("DDS::DomainParticipantFactory::create_participant")?;

        let topic_qos = participant.get_default_topic_qos().best_effort_kind();
        participant
            .set_default_topic_qos(topic_qos.clone())
            .op("DDS::DomainParticipant::set_default_topic_qos")?;
        writeln!(out, "Topic QOS: ")?;
        print_qos(out, QosScope::Topic, CHAT_MESSAGE_TOPIC, &topic_qos)?;

        let name_topic_qos = topic_qos.clone().reliable_kind().transient();
        let chat_topic = participant
            .create_topic::<ChatMessage>(CHAT_MESSAGE_TOPIC, topic_qos)
            .op("DDS::DomainParticipant::create_topic (ChatMessage)")?;
        let name_topic = participant
            .create_topic::<NameService>(NAME_SERVICE_TOPIC, name_topic_qos)
            .op("DDS::DomainParticipant::create_topic (NameService)")?;

        let subscriber_qos = participant
            .get_default_subscriber_qos()
            .partition_single(&settings.partition);
        let subscriber = participant
            .create_subscriber(subscriber_qos)
            .op("DDS::DomainParticipant::create_subscriber")?;

        let chat_reader = subscriber
            .create_reader_with_topic_qos(&chat_topic)
            .op("DDS::Subscriber::create_datareader (ChatMessage)")?;
        writeln!(out, "Data Reader QOS: ")?;
        print_qos(
            out,
            QosScope::DataReader,
            "Chat_ChatMessage reader",
            chat_reader.qos(),
        )?;
        let name_reader = subscriber
            .create_reader_with_topic_qos(&name_topic)
            .op("DDS::Subscriber::create_datareader (NameService)")?;

        writeln!(
            out,
            "MessageBoard has opened: send a ChatMessage with userID = {} to close it....",
            TERMINATION_MESSAGE
        )?;
        writeln!(out)?;
        tracing::info!(
            domain = settings.domain_id,
            partition = %settings.partition,
            "message board open"
        );

        Ok(Self {
            ignored_user,
            poll_interval: settings.poll_interval,
            participant,
            chat_topic,
            name_topic,
            subscriber,
            chat_reader,
            name_reader,
            names: HashMap::new(),
        })
    }

    pub fn ignored_user(&self) -> Option<i32> {
        self.ignored_user
    }

    /// Names currently present in the room, sorted by sender id.
    pub fn present(&self) -> Vec<NameService> {
        let mut present: Vec<_> = self.names.values().cloned().collect();
        present.sort_by_key(|record| record.user_id);
        present
    }

    /// Print arrivals until a termination message or until `stop` fires.
    pub fn run(&mut self, out: &mut dyn Write, stop: &Arc<GuardCondition>) -> ChatResult<BoardReport> {
        let waitset = WaitSet::new();
        waitset
            .attach_condition(self.chat_reader.status_condition())
            .op("DDS::WaitSet::attach_condition (ChatMessage)")?;
        waitset
            .attach_condition(self.name_reader.status_condition())
            .op("DDS::WaitSet::attach_condition (NameService)")?;
        waitset
            .attach_condition(stop.clone())
            .op("DDS::WaitSet::attach_condition (guard)")?;

        let mut report = BoardReport {
            outcome: BoardOutcome::Interrupted,
            messages_shown: 0,
            joins: 0,
            departures: 0,
        };
        loop {
            match waitset.wait(Some(self.poll_interval)) {
                Ok(_) | Err(chatdds::Error::WouldBlock) => {}
                Err(source) => {
                    return Err(ChatError::Middleware {
                        operation: "DDS::WaitSet::wait",
                        source,
                    })
                }
            }

            if self.show_batch(out, &mut report)? {
                report.outcome = BoardOutcome::Terminated;
                break;
            }
            if stop.get_trigger_value() {
                tracing::info!("stop requested");
                report.outcome = BoardOutcome::Interrupted;
                break;
            }
        }
        out.flush()?;
        Ok(report)
    }

    /// Take everything pending on both readers and print it in source
    /// timestamp order. Returns `true` once a termination message was seen.
    fn show_batch(&mut self, out: &mut dyn Write, report: &mut BoardReport) -> ChatResult<bool> {
        let mut events = Vec::new();
        for sample in self
            .name_reader
            .take_samples(
                usize::MAX,
                SampleStateMask::ANY,
                ViewStateMask::ANY,
                InstanceStateMask::ANY,
            )
            .op("Chat::NameServiceDataReader::take")?
        {
            let handle = sample.info.instance_handle;
            let event = if sample.info.valid_data {
                BoardEvent::Joined(handle, sample.data.op("Chat::NameService sample")?)
            } else {
                BoardEvent::Left(handle)
            };
            events.push((sample.info.source_timestamp, event));
        }
        for sample in self
            .chat_reader
            .take_samples(
                usize::MAX,
                SampleStateMask::ANY,
                ViewStateMask::ANY,
                InstanceStateMask::ANY,
            )
            .op("Chat::ChatMessageDataReader::take")?
        {
            // Dispose/unregister notifications carry no message.
            if sample.info.valid_data {
                let msg = sample.data.op("Chat::ChatMessage sample")?;
                events.push((sample.info.source_timestamp, BoardEvent::Message(msg)));
            }
        }
        // Stable: on equal timestamps names stay ahead of messages.
        events.sort_by_key(|(timestamp, _)| *timestamp);

        let mut terminated = false;
        for (_, event) in events {
            match event {
                BoardEvent::Joined(handle, record) => {
                    if self.names.get(&handle) != Some(&record) {
                        writeln!(out, "{} joined the chat room", record.name)?;
                        report.joins += 1;
                        self.names.insert(handle, record);
                    }
                }
                BoardEvent::Left(handle) => {
                    if let Some(record) = self.names.remove(&handle) {
                        writeln!(out, "{} left the chat room", record.name)?;
                        report.departures += 1;
                    }
                }
                BoardEvent::Message(msg) if msg.user_id == TERMINATION_MESSAGE => {
                    writeln!(out, "Termination message received: exiting...")?;
                    terminated = true;
                }
                BoardEvent::Message(msg) => {
                    writeln!(out, "Current time: {}", self.participant.current_time())?;
                    writeln!(out, "{}", msg.content)?;
                    report.messages_shown += 1;
                }
            }
        }
        Ok(terminated)
    }

    /// Delete readers, subscriber, topics and participant in that order.
    pub fn close(self) -> ChatResult<()> {
        let Self {
            participant,
            chat_topic,
            name_topic,
            subscriber,
            chat_reader,
            name_reader,
            ..
        } = self;

        subscriber
            .delete_reader(chat_reader)
            .op("DDS::Subscriber::delete_datareader (ChatMessage)")?;
        subscriber
            .delete_reader(name_reader)
            .op("DDS::Subscriber::delete_datareader (NameService)")?;
        participant
            .delete_subscriber(&subscriber)
            .op("DDS::DomainParticipant::delete_subscriber")?;
        participant
            .delete_topic(&name_topic)
            .op("DDS::DomainParticipant::delete_topic (nameServiceTopic)")?;
        participant
            .delete_topic(&chat_topic)
            .op("DDS::DomainParticipant::delete_topic (chatMessageTopic)")?;
        participant
            .close()
            .op("DDS::DomainParticipantFactory::delete_participant")?;
        tracing::info!("message board closed");
        Ok(())
    }
}
