// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Durable scratch storage for unpublished drafts.

use diesel::prelude::*;
use shiftboard::{CoreError, DraftKey, ScratchDraft, ScratchStore};
use shiftboard_domain::CounterMap;

use crate::Persistence;
use crate::data_models::{ScratchRow, format_date};
use crate::diesel_schema::draft_scratch;
use crate::error::PersistenceError;

impl ScratchStore for Persistence {
    fn load_scratch(
        &mut self,
        session_id: &str,
        key: &DraftKey,
    ) -> Result<Option<ScratchDraft>, CoreError> {
        let slot_date: String = format_date(key.date)?;
        let row: Option<ScratchRow> = draft_scratch::table
            .filter(draft_scratch::session_id.eq(session_id))
            .filter(draft_scratch::store_id.eq(key.store_id.value()))
            .filter(draft_scratch::slot_date.eq(slot_date))
            .filter(draft_scratch::shift_id.eq(key.shift_id.value()))
            .select(ScratchRow::as_select())
            .first(&mut self.conn)
            .optional()
            .map_err(PersistenceError::from)?;

        row.map(|row| -> Result<ScratchDraft, CoreError> {
            let assignments: CounterMap =
                serde_json::from_str(&row.assignments_json).map_err(PersistenceError::from)?;
            Ok(ScratchDraft {
                assignments,
                base_version: row.base_version,
            })
        })
        .transpose()
    }

    fn save_scratch(
        &mut self,
        session_id: &str,
        key: &DraftKey,
        draft: &ScratchDraft,
    ) -> Result<(), CoreError> {
        let slot_date: String = format_date(key.date)?;
        let assignments_json: String =
            serde_json::to_string(&draft.assignments).map_err(PersistenceError::from)?;

        diesel::replace_into(draft_scratch::table)
            .values((
                draft_scratch::session_id.eq(session_id),
                draft_scratch::store_id.eq(key.store_id.value()),
                draft_scratch::slot_date.eq(slot_date),
                draft_scratch::shift_id.eq(key.shift_id.value()),
                draft_scratch::assignments_json.eq(assignments_json),
                draft_scratch::base_version.eq(draft.base_version),
            ))
            .execute(&mut self.conn)
            .map_err(PersistenceError::from)?;
        Ok(())
    }

    fn clear_scratch(&mut self, session_id: &str, key: &DraftKey) -> Result<(), CoreError> {
        let slot_date: String = format_date(key.date)?;
        diesel::delete(
            draft_scratch::table
                .filter(draft_scratch::session_id.eq(session_id))
                .filter(draft_scratch::store_id.eq(key.store_id.value()))
                .filter(draft_scratch::slot_date.eq(slot_date))
                .filter(draft_scratch::shift_id.eq(key.shift_id.value())),
        )
        .execute(&mut self.conn)
        .map_err(PersistenceError::from)?;
        Ok(())
    }

    fn scratch_sessions(&mut self, key: &DraftKey) -> Result<Vec<String>, CoreError> {
        let slot_date: String = format_date(key.date)?;
        let sessions: Vec<String> = draft_scratch::table
            .filter(draft_scratch::store_id.eq(key.store_id.value()))
            .filter(draft_scratch::slot_date.eq(slot_date))
            .filter(draft_scratch::shift_id.eq(key.shift_id.value()))
            .order(draft_scratch::session_id.asc())
            .select(draft_scratch::session_id)
            .load(&mut self.conn)
            .map_err(PersistenceError::from)?;
        Ok(sessions)
    }
}
