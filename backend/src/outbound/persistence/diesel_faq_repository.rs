//! PostgreSQL-backed `FaqRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FaqRepository, FaqRepositoryError};
use crate::domain::{Faq, FaqChanges, FaqId};

use super::error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{FaqRow, FaqUpdate};
use super::pool::DbPool;
use super::schema::faqs;

/// Diesel implementation of the [`FaqRepository`] port.
#[derive(Clone)]
pub struct DieselFaqRepository {
    pool: DbPool,
}

impl DieselFaqRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_faq(row: FaqRow) -> Faq {
    Faq {
        id: FaqId::from_uuid(row.id),
        question: row.question,
        answer: row.answer,
        category: row.category,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// `ILIKE` pattern matching `needle` literally anywhere in the text.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn map_write_error(error: diesel::result::Error, question: &str) -> FaqRepositoryError {
    if is_unique_violation(&error) {
        FaqRepositoryError::duplicate_question(question)
    } else {
        map_diesel_error(error)
    }
}

#[async_trait]
impl FaqRepository for DieselFaqRepository {
    async fn insert(&self, faq: &Faq) -> Result<(), FaqRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = FaqRow {
            id: *faq.id.as_uuid(),
            question: faq.question.clone(),
            answer: faq.answer.clone(),
            category: faq.category.clone(),
            created_at: faq.created_at,
            updated_at: faq.updated_at,
        };
        diesel::insert_into(faqs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, &faq.question))
    }

    async fn find_by_id(&self, id: &FaqId) -> Result<Option<Faq>, FaqRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<FaqRow> = faqs::table
            .find(id.as_uuid())
            .select(FaqRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_faq))
    }

    async fn list(&self) -> Result<Vec<Faq>, FaqRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<FaqRow> = faqs::table
            .order(faqs::created_at.desc())
            .select(FaqRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_faq).collect())
    }

    async fn search(&self, needle: &str) -> Result<Vec<Faq>, FaqRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = contains_pattern(needle);
        let rows: Vec<FaqRow> = faqs::table
            .filter(
                faqs::question
                    .ilike(&pattern)
                    .or(faqs::answer.ilike(&pattern)),
            )
            .order(faqs::created_at.desc())
            .select(FaqRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_faq).collect())
    }

    async fn update(
        &self,
        id: &FaqId,
        changes: &FaqChanges,
    ) -> Result<Option<Faq>, FaqRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = FaqUpdate {
            question: changes.question.as_deref(),
            answer: changes.answer.as_deref(),
            category: changes.category.as_deref(),
            updated_at: changes.updated_at,
        };
        let row: Option<FaqRow> = diesel::update(faqs::table.find(id.as_uuid()))
            .set(&update)
            .returning(FaqRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, changes.question.as_deref().unwrap_or_default()))?;
        Ok(row.map(row_to_faq))
    }

    async fn delete(&self, id: &FaqId) -> Result<bool, FaqRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(faqs::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
