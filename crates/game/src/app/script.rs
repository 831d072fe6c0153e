use std::path::Path;

use realm_engine::{EventSource, WorldEvent};
use serde::Deserialize;
use tracing::{debug, warn};

use super::room_files::read_text;
use super::ViewerError;

/// One line of an event script: the tick it fires on and the event itself.
#[derive(Debug, Clone, Deserialize)]
struct ScriptLine {
    tick: u64,
    event: WorldEvent,
}

/// Replays a JSON-lines event script against the tick counter. Lines are
/// released once their tick has been reached, in file order for equal ticks.
#[derive(Debug, Default)]
pub(crate) struct ScriptedEvents {
    queue: Vec<(u64, WorldEvent)>,
    next: usize,
    dropped_lines: usize,
}

impl ScriptedEvents {
    pub(crate) fn load(path: &Path) -> Result<Self, ViewerError> {
        let raw = read_text(path)?;
        Ok(Self::parse(&raw))
    }

    /// Blank lines and `#` comments are skipped. Lines that fail to decode,
    /// including unknown event types, are logged and dropped.
    pub(crate) fn parse(raw: &str) -> Self {
        let mut queue = Vec::new();
        let mut dropped_lines = 0;
        for (index, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match serde_json::from_str::<ScriptLine>(line) {
                Ok(entry) => queue.push((entry.tick, entry.event)),
                Err(error) => {
                    dropped_lines += 1;
                    warn!(line = index + 1, error = %error, "script_line_dropped");
                }
            }
        }
        queue.sort_by_key(|(tick, _)| *tick);
        Self {
            queue,
            next: 0,
            dropped_lines,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn dropped_lines(&self) -> usize {
        self.dropped_lines
    }

    pub(crate) fn remaining(&self) -> usize {
        self.queue.len() - self.next
    }

    /// Tick of the last scripted event, if any.
    pub(crate) fn last_tick(&self) -> Option<u64> {
        self.queue.last().map(|(tick, _)| *tick)
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, tick: u64, out: &mut Vec<WorldEvent>) {
        while let Some((due, event)) = self.queue.get(self.next) {
            if *due > tick {
                break;
            }
            debug!(tick, due = *due, kind = event.kind(), "script_event_released");
            out.push(event.clone());
            self.next += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
# ambush at the door
{"tick": 30, "event": {"type": "spawn_entity", "payload": {"id": "gob", "type": 110, "x": 4, "y": 2, "hostile": true}}}
{"tick": 0, "event": {"type": "camera_effect", "payload": {"effectType": "flash"}}}
{"tick": 30, "event": {"type": "combat_effect", "payload": {"attackerId": "gob", "targetId": "player", "effectType": "slash", "miss": true}}}
{"tick": 12, "event": {"type": "summon_dragon", "payload": {}}}
not json at all
"#;

    #[test]
    fn parse_sorts_by_tick_and_drops_bad_lines() {
        let script = ScriptedEvents::parse(SCRIPT);
        assert_eq!(script.len(), 3);
        assert_eq!(script.dropped_lines(), 2);
        assert_eq!(script.last_tick(), Some(30));
    }

    #[test]
    fn poll_releases_each_event_once_when_due() {
        let mut script = ScriptedEvents::parse(SCRIPT);
        let mut out = Vec::new();

        script.poll(0, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind(), "camera_effect");

        out.clear();
        script.poll(29, &mut out);
        assert!(out.is_empty());

        script.poll(45, &mut out);
        let kinds: Vec<&str> = out.iter().map(WorldEvent::kind).collect();
        assert_eq!(kinds, vec!["spawn_entity", "combat_effect"]);
        assert_eq!(script.remaining(), 0);

        out.clear();
        script.poll(100, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn load_reads_script_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("intro.jsonl");
        std::fs::write(
            &path,
            r#"{"tick": 3, "event": {"type": "remove_entity", "payload": {"entityId": "gob"}}}"#,
        )
        .expect("write script");

        let script = ScriptedEvents::load(&path).expect("script");
        assert_eq!(script.len(), 1);
        assert_eq!(script.dropped_lines(), 0);
    }
}
