//! Conversation history size guard

use crate::types::ChatMessage;

/// Trim a conversation to the longest suffix fitting a character budget
///
/// Walks newest to oldest, keeping a message only while the running total of
/// content characters stays within `budget`, and stops at the first message
/// that would exceed it regardless of whether an older one might fit on its
/// own. Order is preserved. When the newest message alone exceeds the budget
/// the result is empty.
pub fn trim_messages(mut messages: Vec<ChatMessage>, budget: usize) -> Vec<ChatMessage> {
    let mut total = 0_usize;
    let mut kept = 0_usize;

    for message in messages.iter().rev() {
        let length = message.content.chars().count();
        if total + length > budget {
            break;
        }
        total += length;
        kept += 1;
    }

    messages.split_off(messages.len() - kept)
}
