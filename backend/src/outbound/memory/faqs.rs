//! In-memory `FaqRepository`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::ports::{FaqRepository, FaqRepositoryError};
use crate::domain::{Faq, FaqChanges, FaqId};

use super::lock;

/// FAQ entries held in process memory.
#[derive(Clone)]
pub struct InMemoryFaqRepository {
    faqs: Arc<Mutex<Vec<Faq>>>,
}

impl InMemoryFaqRepository {
    pub(super) fn new(faqs: Arc<Mutex<Vec<Faq>>>) -> Self {
        Self { faqs }
    }
}

fn same_question(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn newest_first<'a>(faqs: impl DoubleEndedIterator<Item = &'a Faq>) -> Vec<Faq> {
    let mut selected: Vec<Faq> = faqs.rev().cloned().collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected
}

#[async_trait]
impl FaqRepository for InMemoryFaqRepository {
    async fn insert(&self, faq: &Faq) -> Result<(), FaqRepositoryError> {
        let mut faqs = lock(&self.faqs);
        if faqs
            .iter()
            .any(|existing| same_question(&existing.question, &faq.question))
        {
            return Err(FaqRepositoryError::duplicate_question(faq.question.clone()));
        }
        faqs.push(faq.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &FaqId) -> Result<Option<Faq>, FaqRepositoryError> {
        Ok(lock(&self.faqs).iter().find(|faq| faq.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Faq>, FaqRepositoryError> {
        Ok(newest_first(lock(&self.faqs).iter()))
    }

    async fn search(&self, needle: &str) -> Result<Vec<Faq>, FaqRepositoryError> {
        let faqs = lock(&self.faqs);
        let matching: Vec<&Faq> = faqs.iter().filter(|faq| faq.matches(needle)).collect();
        Ok(newest_first(matching.into_iter()))
    }

    async fn update(
        &self,
        id: &FaqId,
        changes: &FaqChanges,
    ) -> Result<Option<Faq>, FaqRepositoryError> {
        let mut faqs = lock(&self.faqs);
        if let Some(question) = &changes.question {
            if faqs
                .iter()
                .any(|faq| faq.id != *id && same_question(&faq.question, question))
            {
                return Err(FaqRepositoryError::duplicate_question(question.clone()));
            }
        }
        Ok(faqs.iter_mut().find(|faq| faq.id == *id).map(|faq| {
            if let Some(question) = &changes.question {
                faq.question.clone_from(question);
            }
            if let Some(answer) = &changes.answer {
                faq.answer.clone_from(answer);
            }
            if let Some(category) = &changes.category {
                faq.category.clone_from(category);
            }
            faq.updated_at = changes.updated_at;
            faq.clone()
        }))
    }

    async fn delete(&self, id: &FaqId) -> Result<bool, FaqRepositoryError> {
        let mut faqs = lock(&self.faqs);
        let before = faqs.len();
        faqs.retain(|faq| faq.id != *id);
        Ok(faqs.len() < before)
    }
}
