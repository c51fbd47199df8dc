//! FAQ domain service implementing [`FaqQuery`] and [`FaqCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{FaqCommand, FaqQuery, FaqRepository, FaqRepositoryError};
use crate::domain::{
    Error, Faq, FaqChanges, FaqId, FaqInput, FaqPatch, FaqValidationError, Identity, Role,
    authorize, normalise_category, search_needle, validate_answer, validate_question,
};

/// FAQ service backed by a [`FaqRepository`].
#[derive(Clone)]
pub struct FaqService<R> {
    faqs: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> FaqService<R> {
    /// Create a new service with the given repository.
    pub fn new(faqs: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { faqs, clock }
    }
}

fn invalid(error: FaqValidationError) -> Error {
    let field = error.field();
    Error::invalid_field(field, &format!("invalid_{field}"), error.to_string())
}

impl<R: FaqRepository> FaqService<R> {
    fn map_repository_error(error: FaqRepositoryError) -> Error {
        match error {
            FaqRepositoryError::Connection { message } => {
                Error::internal(format!("faq repository unavailable: {message}"))
            }
            FaqRepositoryError::Query { message } => {
                Error::internal(format!("faq repository error: {message}"))
            }
            FaqRepositoryError::DuplicateQuestion { .. } => {
                Error::conflict("a FAQ with this question already exists")
            }
        }
    }

    fn not_found(id: &FaqId) -> Error {
        Error::not_found(format!("faq {id} not found"))
    }
}

#[async_trait]
impl<R: FaqRepository> FaqQuery for FaqService<R> {
    async fn list(&self) -> Result<Vec<Faq>, Error> {
        self.faqs.list().await.map_err(Self::map_repository_error)
    }

    async fn search(&self, query: &str) -> Result<Vec<Faq>, Error> {
        let needle = search_needle(query).map_err(invalid)?;
        self.faqs
            .search(&needle)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get(&self, id: &FaqId) -> Result<Faq, Error> {
        self.faqs
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id))
    }
}

#[async_trait]
impl<R: FaqRepository> FaqCommand for FaqService<R> {
    async fn create(&self, identity: &Identity, input: FaqInput) -> Result<Faq, Error> {
        authorize(identity, Role::Admin)?;
        let question = input
            .question
            .as_deref()
            .ok_or_else(|| Error::missing_field("question"))
            .and_then(|raw| validate_question(raw).map_err(invalid))?;
        let answer = input
            .answer
            .as_deref()
            .ok_or_else(|| Error::missing_field("answer"))
            .and_then(|raw| validate_answer(raw).map_err(invalid))?;

        let now = self.clock.utc();
        let faq = Faq {
            id: FaqId::random(),
            question,
            answer,
            category: normalise_category(input.category.as_deref()),
            created_at: now,
            updated_at: now,
        };
        self.faqs
            .insert(&faq)
            .await
            .map_err(Self::map_repository_error)?;
        info!(faq_id = %faq.id, admin = %identity.user_id, "faq created");
        Ok(faq)
    }

    async fn update(
        &self,
        identity: &Identity,
        id: &FaqId,
        patch: FaqPatch,
    ) -> Result<Faq, Error> {
        authorize(identity, Role::Admin)?;
        let changes = FaqChanges {
            question: patch
                .question
                .as_deref()
                .map(validate_question)
                .transpose()
                .map_err(invalid)?,
            answer: patch
                .answer
                .as_deref()
                .map(validate_answer)
                .transpose()
                .map_err(invalid)?,
            category: patch
                .category
                .as_deref()
                .map(|raw| normalise_category(Some(raw))),
            updated_at: self.clock.utc(),
        };

        let faq = self
            .faqs
            .update(id, &changes)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id))?;
        info!(faq_id = %id, admin = %identity.user_id, "faq updated");
        Ok(faq)
    }

    async fn delete(&self, identity: &Identity, id: &FaqId) -> Result<(), Error> {
        authorize(identity, Role::Admin)?;
        let deleted = self
            .faqs
            .delete(id)
            .await
            .map_err(Self::map_repository_error)?;
        if !deleted {
            return Err(Self::not_found(id));
        }
        info!(faq_id = %id, admin = %identity.user_id, "faq deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockFaqRepository;
    use crate::test_support::{MutableClock, fixture_timestamp, identity_of, sample_user};
    use rstest::rstest;

    fn service(repo: MockFaqRepository) -> FaqService<MockFaqRepository> {
        FaqService::new(
            Arc::new(repo),
            Arc::new(MutableClock::new(fixture_timestamp())),
        )
    }

    fn admin() -> Identity {
        identity_of(&sample_user(Role::Admin))
    }

    fn faq_input(question: &str, answer: &str) -> FaqInput {
        FaqInput {
            question: Some(question.to_owned()),
            answer: Some(answer.to_owned()),
            category: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_defaults_category_and_trims() {
        let mut repo = MockFaqRepository::new();
        repo.expect_insert().times(1).return_once(|_| Ok(()));

        let faq = service(repo)
            .create(&admin(), faq_input(" How do I reset my password? ", "Use the portal."))
            .await
            .expect("created");

        assert_eq!(faq.question, "How do I reset my password?");
        assert_eq!(faq.category, "General");
        assert_eq!(faq.created_at, fixture_timestamp());
    }

    #[rstest]
    #[case(faq_input("", "answer"), "question")]
    #[case(faq_input("question", "  "), "answer")]
    #[case(FaqInput::default(), "question")]
    #[tokio::test]
    async fn create_rejects_blank_fields(#[case] payload: FaqInput, #[case] field: &str) {
        let mut repo = MockFaqRepository::new();
        repo.expect_insert().never();

        let err = service(repo)
            .create(&admin(), payload)
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], field);
    }

    #[rstest]
    #[tokio::test]
    async fn create_maps_duplicate_question_to_conflict() {
        let mut repo = MockFaqRepository::new();
        repo.expect_insert()
            .return_once(|faq| Err(FaqRepositoryError::duplicate_question(faq.question.clone())));

        let err = service(repo)
            .create(&admin(), faq_input("Where is the library?", "North wing"))
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn mutations_require_admin() {
        let student = identity_of(&sample_user(Role::Student));
        let mut repo = MockFaqRepository::new();
        repo.expect_insert().never();
        repo.expect_delete().never();
        let service = service(repo);

        let create = service
            .create(&student, faq_input("q", "a"))
            .await
            .expect_err("forbidden");
        let delete = service
            .delete(&student, &FaqId::random())
            .await
            .expect_err("forbidden");
        assert_eq!(create.code(), ErrorCode::Forbidden);
        assert_eq!(delete.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[tokio::test]
    async fn search_rejects_blank_queries(#[case] query: &str) {
        let mut repo = MockFaqRepository::new();
        repo.expect_search().never();

        let err = service(repo).search(query).await.expect_err("blank");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "q");
    }

    #[rstest]
    #[tokio::test]
    async fn search_lowercases_the_needle() {
        let mut repo = MockFaqRepository::new();
        repo.expect_search()
            .withf(|needle| needle == "wifi")
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        let found = service(repo).search(" WiFi ").await.expect("searched");
        assert!(found.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn update_writes_only_supplied_fields() {
        let mut repo = MockFaqRepository::new();
        let now = fixture_timestamp();
        repo.expect_update()
            .withf(|_, changes| {
                changes.answer.as_deref() == Some("Room 12")
                    && changes.question.is_none()
                    && changes.category.is_none()
            })
            .times(1)
            .return_once(move |id, _| {
                Ok(Some(Faq {
                    id: *id,
                    question: "Where is the exam cell?".to_owned(),
                    answer: "Room 12".to_owned(),
                    category: "Exams".to_owned(),
                    created_at: now,
                    updated_at: now,
                }))
            });

        let patch = FaqPatch {
            answer: Some("Room 12".to_owned()),
            ..FaqPatch::default()
        };
        let faq = service(repo)
            .update(&admin(), &FaqId::random(), patch)
            .await
            .expect("updated");
        assert_eq!(faq.answer, "Room 12");
    }

    #[rstest]
    #[tokio::test]
    async fn get_and_delete_report_missing_entries() {
        let mut repo = MockFaqRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));
        repo.expect_delete().return_once(|_| Ok(false));
        let service = service(repo);

        let get = service.get(&FaqId::random()).await.expect_err("missing");
        let delete = service
            .delete(&admin(), &FaqId::random())
            .await
            .expect_err("missing");
        assert_eq!(get.code(), ErrorCode::NotFound);
        assert_eq!(delete.code(), ErrorCode::NotFound);
    }
}
