//! SQLite database layer

use std::path::Path;

use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};

use crate::core::ids::{AnswerId, CourseId, QuestionId, ResponseId};
use crate::error::{EntityKind, QuizError, Result};
use crate::storage::migrations;
use crate::storage::store::{
    ChoiceRecord, CourseRecord, DataStore, LabelledResponse, NewChoice, QuestionRecord,
    ResponseMap, format_encoding, parse_encoding, validate_new_question,
};

const SALT_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SALT_LEN: usize = 10;

/// SQLite database wrapper for quiz reference data and responses
pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database (tests, dry runs).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let schema_version = migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            schema_version,
        })
    }

    /// Get a reference to the connection
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version after migrations.
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Insert a course, or return the stored row when the same (number,
    /// name) pair already exists. A number or name already used by a
    /// different course is a [`QuizError::Duplicate`].
    pub fn insert_course(&self, number: &str, name: &str) -> Result<CourseRecord> {
        let existing = self
            .conn
            .query_row(
                "SELECT cid, cn, course_name FROM courses WHERE cn = ? OR course_name = ? \
                 ORDER BY cid LIMIT 1",
                params![number, name],
                |row| {
                    Ok(CourseRecord {
                        id: CourseId::new(row.get(0)?),
                        number: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;

        match existing {
            Some(course) if course.number == number && course.name == name => Ok(course),
            Some(course) if course.number == number => Err(QuizError::duplicate(
                EntityKind::Course,
                format!("course number {number:?} (used by {:?})", course.name),
            )),
            Some(course) => Err(QuizError::duplicate(
                EntityKind::Course,
                format!("course name {name:?} (used by course {:?})", course.number),
            )),
            None => {
                self.conn.execute(
                    "INSERT INTO courses (cn, course_name) VALUES (?, ?)",
                    params![number, name],
                )?;
                Ok(CourseRecord {
                    id: CourseId::new(self.conn.last_insert_rowid()),
                    number: number.to_string(),
                    name: name.to_string(),
                })
            }
        }
    }

    /// Insert every course from `courses` whose number and name are both
    /// unused. Returns how many rows were added.
    pub fn seed_courses(&self, courses: &[(&str, &str)]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut added = 0;
        {
            let mut stmt =
                tx.prepare("INSERT OR IGNORE INTO courses (cn, course_name) VALUES (?, ?)")?;
            for (number, name) in courses {
                added += stmt.execute(params![number, name])?;
            }
        }
        tx.commit()?;
        if added > 0 {
            tracing::info!(added, "seeded reference courses");
        }
        Ok(added)
    }

    pub fn question_count(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM questions")
    }

    pub fn course_count(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM courses")
    }

    pub fn response_count(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM responses")
    }

    pub fn labelled_response_count(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM responses WHERE cid IS NOT NULL")
    }

    fn count(&self, sql: &str) -> Result<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }
}

/// Generate a salt not yet used by any stored response.
fn unique_salt(conn: &Connection) -> Result<String> {
    let mut rng = rand::rng();
    loop {
        let salt: String = (0..SALT_LEN)
            .map(|_| char::from(SALT_ALPHABET[rng.random_range(0..SALT_ALPHABET.len())]))
            .collect();
        let taken = conn
            .query_row("SELECT 1 FROM responses WHERE salt = ?", [&salt], |_| Ok(()))
            .optional()?
            .is_some();
        if !taken {
            return Ok(salt);
        }
    }
}

impl DataStore for Database {
    fn load_questions(&self) -> Result<Vec<QuestionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT q.qid, q.question, a.aid, a.choice, a.vector \
             FROM questions q LEFT JOIN answer_choices a ON a.qid = q.qid \
             ORDER BY q.qid, a.aid",
        )?;
        let mut rows = stmt.query([])?;

        let mut questions: Vec<QuestionRecord> = Vec::new();
        while let Some(row) = rows.next()? {
            let qid = QuestionId::new(row.get(0)?);
            if questions.last().is_none_or(|q| q.id != qid) {
                questions.push(QuestionRecord {
                    id: qid,
                    text: row.get(1)?,
                    choices: Vec::new(),
                });
            }
            let Some(aid) = row.get::<_, Option<i64>>(2)? else {
                continue;
            };
            let aid = AnswerId::new(aid);
            let text: String = row.get(3)?;
            let raw: String = row.get(4)?;
            let encoding = parse_encoding(&raw, aid)?;
            if let Some(question) = questions.last_mut() {
                question.choices.push(ChoiceRecord {
                    id: aid,
                    text,
                    encoding,
                });
            }
        }
        Ok(questions)
    }

    fn load_courses(&self) -> Result<Vec<CourseRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT cid, cn, course_name FROM courses ORDER BY cid")?;
        let rows = stmt.query_map([], |row| {
            Ok(CourseRecord {
                id: CourseId::new(row.get(0)?),
                number: row.get(1)?,
                name: row.get(2)?,
            })
        })?;
        let mut courses = Vec::new();
        for row in rows {
            courses.push(row?);
        }
        Ok(courses)
    }

    fn load_response(&self, id: ResponseId) -> Result<Option<ResponseMap>> {
        let exists = self
            .conn
            .query_row("SELECT 1 FROM responses WHERE rid = ?", [id.get()], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let mut stmt = self
            .conn
            .prepare("SELECT qid, aid FROM response_mappings WHERE rid = ? ORDER BY qid")?;
        let rows = stmt.query_map([id.get()], |row| {
            Ok((QuestionId::new(row.get(0)?), AnswerId::new(row.get(1)?)))
        })?;
        let mut answers = ResponseMap::new();
        for row in rows {
            let (qid, aid) = row?;
            answers.insert(qid, aid);
        }
        Ok(Some(answers))
    }

    fn load_labelled_responses(&self) -> Result<Vec<LabelledResponse>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.rid, r.cid, m.qid, m.aid \
             FROM responses r JOIN response_mappings m ON m.rid = r.rid \
             WHERE r.cid IS NOT NULL \
             ORDER BY r.rid, m.qid",
        )?;
        let mut rows = stmt.query([])?;

        let mut responses: Vec<LabelledResponse> = Vec::new();
        while let Some(row) = rows.next()? {
            let rid = ResponseId::new(row.get(0)?);
            let qid = QuestionId::new(row.get(2)?);
            let aid = AnswerId::new(row.get(3)?);
            if responses.last().is_none_or(|r| r.id != rid) {
                responses.push(LabelledResponse {
                    id: rid,
                    course: CourseId::new(row.get(1)?),
                    answers: ResponseMap::new(),
                });
            }
            if let Some(response) = responses.last_mut() {
                response.answers.insert(qid, aid);
            }
        }
        Ok(responses)
    }

    fn store_response(&self, answers: &ResponseMap, course: Option<CourseId>) -> Result<ResponseId> {
        let tx = self.conn.unchecked_transaction()?;

        if let Some(cid) = course {
            let known = tx
                .query_row("SELECT 1 FROM courses WHERE cid = ?", [cid.get()], |_| Ok(()))
                .optional()?
                .is_some();
            if !known {
                return Err(QuizError::not_found(EntityKind::Course, cid));
            }
        }

        for (qid, aid) in answers {
            let owner: Option<i64> = tx
                .query_row("SELECT qid FROM answer_choices WHERE aid = ?", [aid.get()], |row| {
                    row.get(0)
                })
                .optional()?;
            if owner != Some(qid.get()) {
                return Err(QuizError::not_found(
                    EntityKind::Answer,
                    format!("{aid} under {qid}"),
                ));
            }
        }

        let salt = unique_salt(&tx)?;
        let created = chrono::Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO responses (cid, salt, time_created) VALUES (?, ?, ?)",
            params![course.map(CourseId::get), salt, created],
        )?;
        let rid: i64 = tx.query_row("SELECT rid FROM responses WHERE salt = ?", [&salt], |row| {
            row.get(0)
        })?;

        {
            let mut stmt =
                tx.prepare("INSERT INTO response_mappings (rid, qid, aid) VALUES (?, ?, ?)")?;
            for (qid, aid) in answers {
                stmt.execute(params![rid, qid.get(), aid.get()])?;
            }
        }
        tx.commit()?;

        let rid = ResponseId::new(rid);
        tracing::info!(
            response = %rid,
            labelled = course.is_some(),
            answers = answers.len(),
            "stored response"
        );
        Ok(rid)
    }

    fn store_question(&self, text: &str, choices: &[NewChoice]) -> Result<QuestionRecord> {
        validate_new_question(text, choices)?;

        let tx = self.conn.unchecked_transaction()?;
        let existing = tx
            .query_row("SELECT qid FROM questions WHERE question = ?", [text], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;
        if existing.is_some() {
            return Err(QuizError::duplicate(EntityKind::Question, format!("{text:?}")));
        }

        tx.execute("INSERT INTO questions (question) VALUES (?)", [text])?;
        let qid: i64 = tx.query_row("SELECT qid FROM questions WHERE question = ?", [text], |row| {
            row.get(0)
        })?;

        let mut stored = Vec::with_capacity(choices.len());
        {
            let mut stmt =
                tx.prepare("INSERT INTO answer_choices (qid, choice, vector) VALUES (?, ?, ?)")?;
            for choice in choices {
                stmt.execute(params![qid, choice.text, format_encoding(&choice.encoding)])?;
                stored.push(ChoiceRecord {
                    id: AnswerId::new(tx.last_insert_rowid()),
                    text: choice.text.clone(),
                    encoding: choice.encoding.clone(),
                });
            }
        }
        tx.commit()?;

        let qid = QuestionId::new(qid);
        tracing::info!(question = %qid, choices = stored.len(), "stored question");
        Ok(QuestionRecord {
            id: qid,
            text: text.to_string(),
            choices: stored,
        })
    }
}
