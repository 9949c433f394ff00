use crate::session::Session;
use chrono::Local;
use common::UgnRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// Saves the UGN record of each finished game, once per distinct record
#[derive(Debug)]
pub struct Recorder {
    dir: Option<PathBuf>,
    last: Option<UgnRecord>,
}

impl Recorder {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Recorder { dir, last: None }
    }

    pub fn save(&mut self, session: &Session) {
        let (Some(dir), Some(record)) = (&self.dir, session.record()) else {
            return;
        };
        if self.last.as_ref() == Some(&record) {
            return;
        }
        let now = Local::now();
        let stamped = UgnRecord {
            date: Some(now.format("%Y-%m-%d").to_string()),
            time: Some(now.format("%H:%M:%S").to_string()),
            ..record.clone()
        };
        match write_record(dir, &stamped) {
            Ok(path) => info!("saved game record to {}", path.display()),
            Err(err) => warn!("failed to save game record {}: {}", record.game_id, err),
        }
        self.last = Some(record);
    }
}

fn write_record(dir: &Path, record: &UgnRecord) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(record.file_name());
    fs::write(&path, record.to_string())?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(game_id: &str) -> String {
        format!(
            r#"{{"type":"game_state","payload":{{
            "game_id":"{}","your_symbol":"X","player_x_name":"alice","player_o_name":"bob",
            "current_turn":"O","game_status":"finished","winner":"X","is_your_turn":false,
            "active_board":-1,"ugn_moves":["E5","E1#"],
            "board":{{"boards":[
                {{"cells":["","","","","","","","",""]}},{{"cells":["","","","","","","","",""]}},
                {{"cells":["","","","","","","","",""]}},{{"cells":["","","","","","","","",""]}},
                {{"cells":["","","","","","","","",""]}},{{"cells":["","","","","","","","",""]}},
                {{"cells":["","","","","","","","",""]}},{{"cells":["","","","","","","","",""]}},
                {{"cells":["","","","","","","","",""]}}],
            "board_states":["undecided","undecided","undecided","undecided","undecided",
                            "undecided","undecided","undecided","undecided"]}}}}}}"#,
            game_id
        )
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("uttt-{}-{}", name, std::process::id()))
    }

    fn concluded_session(game_id: &str) -> Session {
        let mut session = Session::new();
        session.connected();
        session.handle_message(&finished(game_id));
        session
    }

    #[test]
    fn test_saves_finished_game_once() {
        let dir = scratch_dir("records");
        let mut session = Session::new();
        session.connected();
        let mut recorder = Recorder::new(Some(dir.clone()));

        recorder.save(&session);
        assert!(!dir.join("rec-1.ugn").exists());

        session.handle_message(&finished("rec-1"));
        recorder.save(&session);
        let text = fs::read_to_string(dir.join("rec-1.ugn")).unwrap();
        let record: UgnRecord = text.parse().unwrap();
        let expected = session.record().unwrap();
        assert_eq!(record.game_id, expected.game_id);
        assert_eq!(record.winner, expected.winner);
        assert_eq!(record.moves, expected.moves);
        assert_eq!(record.date.map(|d| d.len()), Some(10));
        assert_eq!(record.time.map(|t| t.len()), Some(8));

        fs::remove_file(dir.join("rec-1.ugn")).unwrap();
        recorder.save(&session);
        assert!(!dir.join("rec-1.ugn").exists());
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn test_game_id_cannot_leave_record_dir() {
        let base = scratch_dir("escape");
        let dir = base.join("records");
        let mut recorder = Recorder::new(Some(dir.clone()));
        recorder.save(&concluded_session("../escaped"));

        assert!(!base.join("escaped.ugn").exists());
        let saved: Vec<PathBuf> = fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(saved, vec![dir.join("___escaped.ugn")]);
        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn test_without_directory() {
        let session = concluded_session("rec-2");
        let mut recorder = Recorder::new(None);
        recorder.save(&session);
        assert!(recorder.last.is_none());
    }
}
