//! End-to-end task workflow: draft, execute, complete, close.

use super::helpers::{date, request, uid, world};
use remit::assignment::domain::{AttachmentRef, CompletionReport};
use remit::assignment::services::TaskBoardError;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_task_lifecycle_across_roles() {
    let org = world().await;

    let group = org
        .catalog
        .create_group(&org.admin, "Correspondence")
        .await
        .expect("group");

    let mut req = request(
        "Answer citizen letter 4711",
        vec![uid(&org.employee)],
        date(2026, 3, 20),
    );
    req.group = Some(group.id());
    req.number = Some("4711".to_owned());
    req.brief = Some(AttachmentRef::new("letters/4711.pdf").expect("valid attachment"));

    let created = org
        .board
        .create_task(&org.head, req)
        .await
        .expect("task creation");
    let id = created.task.id();
    assert_eq!(created.task.group(), Some(group.id()));
    assert_eq!(created.task.number(), Some("4711"));

    // The executor finds it on their desk.
    let on_desk = org
        .board
        .on_execution(&org.employee)
        .await
        .expect("execution view");
    assert_eq!(on_desk.len(), 1);
    assert_eq!(on_desk[0].task.id(), id);

    // Completion with evidence and a comment.
    let completed = org
        .board
        .complete_task(
            &org.employee,
            id,
            CompletionReport {
                evidence: Some(AttachmentRef::new("replies/4711-reply.pdf").expect("attachment")),
                comment: Some("Reply dispatched by registered mail".to_owned()),
            },
        )
        .await
        .expect("completion");
    assert!(completed.task.is_completed());
    assert_eq!(
        completed.task.execution_comment(),
        Some("Reply dispatched by registered mail")
    );

    // The initiator reviews and closes.
    let pending = org
        .board
        .pending_closure(&org.head)
        .await
        .expect("pending view");
    assert_eq!(pending.len(), 1);

    let closed = org.board.close_task(&org.head, id).await.expect("closure");
    assert!(closed.task.is_closed());

    // Closed work leaves the execution desk.
    let cleared = org
        .board
        .on_execution(&org.employee)
        .await
        .expect("execution view");
    assert!(cleared.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closure_is_terminal_for_revisions() {
    let org = world().await;
    let created = org
        .board
        .create_task(
            &org.head,
            request("One-way door", vec![uid(&org.employee)], date(2026, 3, 20)),
        )
        .await
        .expect("task creation");
    let id = created.task.id();

    org.board
        .complete_task(&org.employee, id, CompletionReport::default())
        .await
        .expect("completion");
    org.board.close_task(&org.head, id).await.expect("closure");

    let revision = remit::assignment::domain::TaskRevision {
        title: Some("Reopened".to_owned()),
        ..remit::assignment::domain::TaskRevision::default()
    };
    let result = org.board.update_task(&org.head, id, revision).await;
    assert!(matches!(result, Err(TaskBoardError::Validation(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_tasks_leave_the_outgoing_view() {
    let org = world().await;
    let created = org
        .board
        .create_task(
            &org.head,
            request("Signed off", vec![uid(&org.employee)], date(2026, 3, 20)),
        )
        .await
        .expect("task creation");
    let id = created.task.id();

    let before = org.board.outgoing(&org.head).await.expect("outgoing view");
    assert_eq!(before.len(), 1);

    org.board
        .complete_task(&org.employee, id, CompletionReport::default())
        .await
        .expect("completion");
    org.board.close_task(&org.head, id).await.expect("closure");

    let after = org.board.outgoing(&org.head).await.expect("outgoing view");
    assert!(after.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_date_drives_urgency_over_time() {
    let org = world().await;
    org.board
        .create_task(
            &org.head,
            request("Due inside the window", vec![uid(&org.employee)], date(2026, 3, 4)),
        )
        .await
        .expect("near task");
    org.board
        .create_task(
            &org.head,
            request("Due far out", vec![uid(&org.employee)], date(2026, 4, 20)),
        )
        .await
        .expect("far task");

    let urgent = org.board.urgent(&org.director).await.expect("urgent view");
    assert_eq!(urgent.len(), 1);
    assert_eq!(urgent[0].task.title(), "Due inside the window");

    let overdue = org.board.overdue(&org.director).await.expect("overdue view");
    assert!(overdue.is_empty());
}
