//! Incremental decoding of an upstream server-sent event stream.

use serde::Deserialize;

/// One decoded `data:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseData {
    Payload(String),
    /// The `[DONE]` sentinel
    Done,
}

/// Splits arbitrary byte chunks into SSE `data:` payloads.
///
/// Chunks may end mid-line or mid-character; incomplete lines stay buffered
/// until the next chunk or [`SseLineDecoder::finish`].
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    buffer: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseData> {
        self.buffer.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(data) = parse_line(&line) {
                out.push(data);
            }
        }
        out
    }

    /// Flush a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<SseData> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        parse_line(&line)
    }
}

fn parse_line(raw: &[u8]) -> Option<SseData> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\r', '\n']);

    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() {
        return None;
    }
    if data == "[DONE]" {
        return Some(SseData::Done);
    }
    Some(SseData::Payload(data.to_string()))
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    content: Option<String>,
}

/// Extract the text delta of an OpenAI-compatible completion chunk.
///
/// Returns `Ok(None)` for chunks without content (role announcements, finish markers).
pub fn parse_delta(payload: &str) -> Result<Option<String>, serde_json::Error> {
    let chunk: CompletionChunk = serde_json::from_str(payload)?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        let events = decoder.push(b":1}\n\ndata: [DONE]\n");
        assert_eq!(
            events,
            vec![
                SseData::Payload("{\"a\":1}".to_string()),
                SseData::Done
            ]
        );
    }

    #[test]
    fn test_multibyte_character_split() {
        let line = "data: 你好\n".as_bytes();
        let mut decoder = SseLineDecoder::new();
        // Split inside the first Chinese character
        assert!(decoder.push(&line[..7]).is_empty());
        assert_eq!(
            decoder.push(&line[7..]),
            vec![SseData::Payload("你好".to_string())]
        );
    }

    #[test]
    fn test_comments_and_other_fields_ignored() {
        let mut decoder = SseLineDecoder::new();
        let events = decoder.push(b": keep-alive\r\nevent: message\r\nid: 3\r\ndata: x\r\n");
        assert_eq!(events, vec![SseData::Payload("x".to_string())]);
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish(), Some(SseData::Payload("tail".to_string())));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_parse_delta() {
        let payload = r#"{"id":"1","choices":[{"index":0,"delta":{"content":"你好"}}]}"#;
        assert_eq!(parse_delta(payload).unwrap(), Some("你好".to_string()));

        let role_only = r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_delta(role_only).unwrap(), None);

        let finish = r#"{"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_delta(finish).unwrap(), None);

        assert!(parse_delta("not json").is_err());
    }
}
