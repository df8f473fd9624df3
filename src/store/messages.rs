use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{Conversation, Message};

/// Conversations and their messages. Conversations are keyed by the
/// normalized participant pair, so the check-and-create for a thread happens
/// under a single entry guard and two concurrent first messages between the
/// same pair land in one conversation.
#[derive(Debug, Default)]
pub struct MessageStore {
    conversations: DashMap<(Uuid, Uuid), Conversation>,
    messages: DashMap<Uuid, Message>,
}

fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the conversation between two users, creating it when absent.
    pub fn find_or_create_conversation(&self, a: Uuid, b: Uuid) -> Conversation {
        self.conversations
            .entry(pair_key(a, b))
            .or_insert_with(|| {
                let now = Utc::now();
                Conversation {
                    id: Uuid::new_v4(),
                    participants: [a, b],
                    last_message: String::new(),
                    created_at: now,
                    updated_at: now,
                }
            })
            .clone()
    }

    pub fn find_conversation_between(&self, a: Uuid, b: Uuid) -> Option<Conversation> {
        self.conversations.get(&pair_key(a, b)).map(|c| c.clone())
    }

    /// Appends a message and refreshes the conversation preview.
    pub fn append(&self, message: Message) -> Message {
        if let Some(mut conversation) = self
            .conversations
            .get_mut(&pair_key(message.sender_id, message.recipient_id))
        {
            conversation.last_message = message.content.clone();
            conversation.updated_at = Utc::now();
        }
        self.messages.insert(message.id, message.clone());
        message
    }

    pub fn conversations_for(&self, user_id: Uuid) -> Vec<Conversation> {
        let mut matched: Vec<Conversation> = self
            .conversations
            .iter()
            .filter(|c| c.involves(user_id))
            .map(|c| c.clone())
            .collect();
        matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        matched
    }

    pub fn messages_in(&self, conversation_id: Uuid) -> Vec<Message> {
        let mut matched: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .map(|m| m.clone())
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        matched
    }

    pub fn unread_count(&self, conversation_id: Uuid, recipient_id: Uuid) -> usize {
        self.messages
            .iter()
            .filter(|m| {
                m.conversation_id == conversation_id
                    && m.recipient_id == recipient_id
                    && !m.is_read
            })
            .count()
    }

    pub fn unread_total(&self, recipient_id: Uuid) -> usize {
        self.messages
            .iter()
            .filter(|m| m.recipient_id == recipient_id && !m.is_read)
            .count()
    }

    /// Marks a message read. Only the recipient may do so.
    pub fn mark_read(&self, message_id: Uuid, recipient_id: Uuid) -> bool {
        match self.messages.get_mut(&message_id) {
            Some(mut message) if message.recipient_id == recipient_id => {
                message.is_read = true;
                true
            }
            _ => false,
        }
    }
}
