/// Markdown code fence delimiter.
pub const FENCE: &str = "```";

/// Language labels dropped when they open a fenced block.
const LANGUAGE_TAGS: &[&str] = &["dockerfile", "docker", "containerfile"];

/// Error type for replies that cannot be turned into a Dockerfile
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SanitizeError {
    #[error("Assistant response has an unterminated code fence")]
    UnterminatedFence,

    #[error("Assistant response is empty after removing code fences")]
    Empty,
}

/// Strip markdown fences from an agent reply.
///
/// The reply is trimmed. When it contains fence markers, only the text between
/// the first and the last marker is kept, and a leading language tag line
/// (`dockerfile`, case-insensitive) is dropped. Text without markers passes
/// through trimmed.
///
/// A single marker means the block was never closed, which is an error rather
/// than a guess at where the content ends.
pub fn strip_fences(reply: &str) -> Result<String, SanitizeError> {
    let trimmed = reply.trim();

    let text = match (trimmed.find(FENCE), trimmed.rfind(FENCE)) {
        // Overlapping markers (a run of four or five backticks) count as one
        (Some(start), Some(end)) if end < start + FENCE.len() => {
            return Err(SanitizeError::UnterminatedFence)
        }
        (Some(start), Some(end)) => {
            drop_language_tag(trimmed[start + FENCE.len()..end].trim_start())
        }
        _ => trimmed,
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(SanitizeError::Empty);
    }

    Ok(text.to_string())
}

/// Remove the first line when it is only a language label.
fn drop_language_tag(block: &str) -> &str {
    let (first, rest) = block.split_once('\n').unwrap_or((block, ""));
    let label = first.trim().to_ascii_lowercase();

    if LANGUAGE_TAGS.contains(&label.as_str()) {
        rest
    } else {
        block
    }
}
