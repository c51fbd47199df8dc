//! Tests for the ticket lifecycle service.

use super::*;
use crate::domain::ports::{MockAttachmentStore, MockTicketRepository};
use crate::domain::{AttachmentUpload, ErrorCode, User};
use crate::test_support::{
    MutableClock, fixture_timestamp, identity_of, sample_ticket, sample_user,
};
use mockall::predicate::eq;
use rstest::rstest;

type Service = TicketService<MockTicketRepository, MockAttachmentStore>;

fn make_service(repo: MockTicketRepository, store: MockAttachmentStore) -> Service {
    TicketService::new(
        Arc::new(repo),
        Arc::new(store),
        Arc::new(MutableClock::new(fixture_timestamp())),
    )
}

fn input(title: &str, description: &str) -> CreateTicketInput {
    CreateTicketInput {
        title: Some(title.to_owned()),
        description: Some(description.to_owned()),
        ..CreateTicketInput::default()
    }
}

fn hydrate(draft: &TicketDraft, owner: &User) -> Ticket {
    let mut ticket = sample_ticket(owner);
    ticket.id = draft.id;
    ticket.title = draft.title.clone();
    ticket.description = draft.description.clone();
    ticket.category = draft.category;
    ticket.priority = draft.priority;
    ticket.attachment_path = draft.attachment_path.clone();
    ticket
}

fn repo_returning(ticket: Ticket) -> MockTicketRepository {
    let mut repo = MockTicketRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(ticket)));
    repo
}

#[rstest]
#[tokio::test]
async fn create_applies_defaults_and_owner() {
    let student = sample_user(Role::Student);
    let owner = student.clone();
    let mut repo = MockTicketRepository::new();
    repo.expect_insert()
        .withf(|draft| {
            draft.priority == TicketPriority::Medium && draft.category == TicketCategory::Other
        })
        .times(1)
        .returning(move |draft| Ok(hydrate(draft, &owner)));
    let service = make_service(repo, MockAttachmentStore::new());

    let ticket = service
        .create(&identity_of(&student), input("  Wifi down ", "No signal in hostel B"))
        .await
        .expect("ticket created");

    assert_eq!(ticket.title, "Wifi down");
    assert_eq!(ticket.owner.id, student.id);
    assert_eq!(ticket.status, TicketStatus::Open);
}

#[rstest]
#[tokio::test]
async fn create_is_forbidden_for_admins() {
    let admin = sample_user(Role::Admin);
    let service = make_service(MockTicketRepository::new(), MockAttachmentStore::new());

    let err = service
        .create(&identity_of(&admin), input("Title", "Body"))
        .await
        .expect_err("admins cannot file tickets");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(CreateTicketInput::default(), "title")]
#[case(input("", "Body"), "title")]
#[case(input(&"x".repeat(101), "Body"), "title")]
#[case(input("Title", "   "), "description")]
#[case(CreateTicketInput { category: Some("canteen".into()), ..input("Title", "Body") }, "category")]
#[case(CreateTicketInput { priority: Some("urgent".into()), ..input("Title", "Body") }, "priority")]
#[tokio::test]
async fn create_rejects_invalid_input(#[case] payload: CreateTicketInput, #[case] field: &str) {
    let student = sample_user(Role::Student);
    let service = make_service(MockTicketRepository::new(), MockAttachmentStore::new());

    let err = service
        .create(&identity_of(&student), payload)
        .await
        .expect_err("validation error");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("details present");
    assert_eq!(details["field"], field);
}

#[rstest]
#[tokio::test]
async fn create_stores_attachment_before_insert() {
    let student = sample_user(Role::Student);
    let owner = student.clone();
    let mut store = MockAttachmentStore::new();
    store
        .expect_save()
        .times(1)
        .return_once(|_| Ok("3f2a.png".to_owned()));
    let mut repo = MockTicketRepository::new();
    repo.expect_insert()
        .withf(|draft| draft.attachment_path.as_deref() == Some("3f2a.png"))
        .times(1)
        .returning(move |draft| Ok(hydrate(draft, &owner)));
    let service = make_service(repo, store);
    let upload = AttachmentUpload::new("screen.png", vec![1, 2, 3]).expect("upload");

    let ticket = service
        .create(
            &identity_of(&student),
            CreateTicketInput {
                attachment: Some(upload),
                ..input("Title", "Body")
            },
        )
        .await
        .expect("created");

    assert_eq!(ticket.attachment_path.as_deref(), Some("3f2a.png"));
}

#[rstest]
#[tokio::test]
async fn create_fails_without_ticket_when_attachment_storage_fails() {
    let student = sample_user(Role::Student);
    let mut store = MockAttachmentStore::new();
    store
        .expect_save()
        .times(1)
        .return_once(|_| Err(AttachmentStoreError::io("disk full")));
    let mut repo = MockTicketRepository::new();
    repo.expect_insert().never();
    let service = make_service(repo, store);
    let upload = AttachmentUpload::new("form.pdf", vec![1]).expect("upload");

    let err = service
        .create(
            &identity_of(&student),
            CreateTicketInput {
                attachment: Some(upload),
                ..input("Title", "Body")
            },
        )
        .await
        .expect_err("storage failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn create_removes_stored_attachment_when_insert_fails() {
    let student = sample_user(Role::Student);
    let mut store = MockAttachmentStore::new();
    store
        .expect_save()
        .times(1)
        .return_once(|_| Ok("a.pdf".to_owned()));
    store
        .expect_remove()
        .withf(|path| path == "a.pdf")
        .times(1)
        .return_once(|_| Ok(()));
    let mut repo = MockTicketRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(TicketRepositoryError::query("constraint")));
    let service = make_service(repo, store);
    let upload = AttachmentUpload::new("form.pdf", vec![1]).expect("upload");

    let err = service
        .create(
            &identity_of(&student),
            CreateTicketInput {
                attachment: Some(upload),
                ..input("Title", "Body")
            },
        )
        .await
        .expect_err("insert failure");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn get_reports_missing_before_forbidden() {
    let stranger = sample_user(Role::Student);
    let mut repo = MockTicketRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));
    let service = make_service(repo, MockAttachmentStore::new());

    let err = service
        .get(&identity_of(&stranger), &TicketId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Role::Student, Some(ErrorCode::Forbidden))]
#[case(Role::Admin, None)]
#[tokio::test]
async fn get_is_limited_to_owner_or_admin(
    #[case] caller_role: Role,
    #[case] expected: Option<ErrorCode>,
) {
    let owner = sample_user(Role::Student);
    let caller = sample_user(caller_role);
    let ticket = sample_ticket(&owner);
    let id = ticket.id;
    let service = make_service(repo_returning(ticket), MockAttachmentStore::new());

    let result = service.get(&identity_of(&caller), &id).await;
    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn owner_update_drops_admin_only_fields() {
    let owner = sample_user(Role::Student);
    let ticket = sample_ticket(&owner);
    let id = ticket.id;
    let returned = ticket.clone();
    let mut repo = repo_returning(ticket);
    repo.expect_update()
        .withf(|_, changes| {
            changes.title.as_deref() == Some("New title")
                && changes.status.is_none()
                && changes.priority.is_none()
                && changes.response.is_none()
                && changes.resolved_at.is_none()
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(returned)));
    repo.expect_append_comment().never();
    let service = make_service(repo, MockAttachmentStore::new());

    let patch = TicketPatch {
        title: Some("New title".to_owned()),
        status: Some("resolved".to_owned()),
        priority: Some("high".to_owned()),
        response: Some("self-answered".to_owned()),
        admin_comment: Some("sneaky".to_owned()),
        ..TicketPatch::default()
    };
    service
        .update(&identity_of(&owner), &id, patch)
        .await
        .expect("owner update");
}

#[rstest]
#[tokio::test]
async fn admin_resolve_stamps_resolved_at_from_the_clock() {
    let owner = sample_user(Role::Student);
    let admin = sample_user(Role::Admin);
    let ticket = sample_ticket(&owner);
    let id = ticket.id;
    let mut resolved = ticket.clone();
    resolved.status = TicketStatus::Resolved;
    resolved.resolved_at = Some(fixture_timestamp());
    let mut repo = repo_returning(ticket);
    repo.expect_update()
        .withf(|_, changes| {
            changes.status == Some(TicketStatus::Resolved)
                && changes.resolved_at == Some(fixture_timestamp())
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(resolved)));
    let service = make_service(repo, MockAttachmentStore::new());

    let patch = TicketPatch {
        status: Some("resolved".to_owned()),
        ..TicketPatch::default()
    };
    let updated = service
        .update(&identity_of(&admin), &id, patch)
        .await
        .expect("admin update");
    assert_eq!(updated.resolved_at, Some(fixture_timestamp()));
}

#[rstest]
#[tokio::test]
async fn admin_update_appends_comment_instead_of_overwriting() {
    let owner = sample_user(Role::Student);
    let admin = sample_user(Role::Admin);
    let ticket = sample_ticket(&owner);
    let id = ticket.id;
    let after_update = ticket.clone();
    let after_comment = ticket.clone();
    let admin_id = admin.id;
    let mut repo = repo_returning(ticket);
    repo.expect_update()
        .times(1)
        .return_once(move |_, _| Ok(Some(after_update)));
    repo.expect_append_comment()
        .withf(move |comment| comment.comment == "Looking into it" && comment.admin_id == admin_id)
        .times(1)
        .return_once(move |_| Ok(Some(after_comment)));
    let service = make_service(repo, MockAttachmentStore::new());

    let patch = TicketPatch {
        priority: Some("high".to_owned()),
        admin_comment: Some("  Looking into it ".to_owned()),
        ..TicketPatch::default()
    };
    service
        .update(&identity_of(&admin), &id, patch)
        .await
        .expect("admin update");
}

#[rstest]
#[tokio::test]
async fn update_rejects_unknown_status() {
    let owner = sample_user(Role::Student);
    let admin = sample_user(Role::Admin);
    let ticket = sample_ticket(&owner);
    let id = ticket.id;
    let mut repo = repo_returning(ticket);
    repo.expect_update().never();
    let service = make_service(repo, MockAttachmentStore::new());

    let patch = TicketPatch {
        status: Some("closed".to_owned()),
        ..TicketPatch::default()
    };
    let err = service
        .update(&identity_of(&admin), &id, patch)
        .await
        .expect_err("invalid status");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(Role::Student, "note", ErrorCode::Forbidden)]
#[case(Role::Admin, "   ", ErrorCode::InvalidRequest)]
#[tokio::test]
async fn add_comment_guards(
    #[case] role: Role,
    #[case] text: &str,
    #[case] expected: ErrorCode,
) {
    let caller = sample_user(role);
    let mut repo = MockTicketRepository::new();
    repo.expect_append_comment().never();
    let service = make_service(repo, MockAttachmentStore::new());

    let err = service
        .add_comment(&identity_of(&caller), &TicketId::random(), text.to_owned())
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn add_comment_reports_missing_ticket() {
    let admin = sample_user(Role::Admin);
    let mut repo = MockTicketRepository::new();
    repo.expect_append_comment().return_once(|_| Ok(None));
    let service = make_service(repo, MockAttachmentStore::new());

    let err = service
        .add_comment(&identity_of(&admin), &TicketId::random(), "hi".to_owned())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn respond_forces_in_progress() {
    let owner = sample_user(Role::Student);
    let admin = sample_user(Role::Admin);
    let mut ticket = sample_ticket(&owner);
    ticket.status = TicketStatus::InProgress;
    ticket.response = Some("On it".to_owned());
    let id = ticket.id;
    let mut repo = MockTicketRepository::new();
    repo.expect_update()
        .withf(|_, changes| {
            changes.status == Some(TicketStatus::InProgress)
                && changes.response.as_deref() == Some("On it")
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(ticket)));
    let service = make_service(repo, MockAttachmentStore::new());

    let ticket = service
        .respond(&identity_of(&admin), &id, "On it".to_owned())
        .await
        .expect("responded");
    assert_eq!(ticket.status, TicketStatus::InProgress);
}

#[rstest]
#[tokio::test]
async fn delete_succeeds_when_attachment_removal_fails() {
    let owner = sample_user(Role::Student);
    let mut ticket = sample_ticket(&owner);
    ticket.attachment_path = Some("gone.pdf".to_owned());
    let id = ticket.id;
    let mut repo = repo_returning(ticket);
    repo.expect_delete().times(1).return_once(|_| Ok(true));
    let mut store = MockAttachmentStore::new();
    store
        .expect_remove()
        .withf(|path| path == "gone.pdf")
        .times(1)
        .return_once(|_| Err(AttachmentStoreError::io("no such file")));
    let service = make_service(repo, store);

    service
        .delete(&identity_of(&owner), &id)
        .await
        .expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn delete_forbids_strangers() {
    let owner = sample_user(Role::Student);
    let stranger = sample_user(Role::Student);
    let ticket = sample_ticket(&owner);
    let id = ticket.id;
    let mut repo = repo_returning(ticket);
    repo.expect_delete().never();
    let service = make_service(repo, MockAttachmentStore::new());

    let err = service
        .delete(&identity_of(&stranger), &id)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn list_all_requires_admin() {
    let student = sample_user(Role::Student);
    let mut repo = MockTicketRepository::new();
    repo.expect_list_all().never();
    let service = make_service(repo, MockAttachmentStore::new());

    let err = service
        .list_all(&identity_of(&student))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn list_own_queries_by_caller() {
    let student = sample_user(Role::Student);
    let owner_id = student.id;
    let ticket = sample_ticket(&student);
    let mut repo = MockTicketRepository::new();
    repo.expect_list_by_owner()
        .with(eq(owner_id))
        .times(1)
        .return_once(move |_| Ok(vec![ticket]));
    let service = make_service(repo, MockAttachmentStore::new());

    let tickets = service
        .list_own(&identity_of(&student))
        .await
        .expect("listed");
    assert_eq!(tickets.len(), 1);
}
