//! End-to-end redirection: forked children under the urgent window rule.

use super::helpers::{date, request, uid, world};
use remit::assignment::services::{RedirectRequest, TaskBoardError};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn head_redirects_directorate_work_into_the_department() {
    let org = world().await;
    let source = org
        .board
        .create_task(
            &org.deputy_director,
            request("Annual archive review", vec![uid(&org.head)], date(2026, 4, 1)),
        )
        .await
        .expect("source task");

    let child = org
        .board
        .redirect_task(
            &org.head,
            source.task.id(),
            RedirectRequest {
                executors: vec![uid(&org.employee)],
                execution_date: Some(date(2026, 3, 25)),
                resolution: Some("Review shelf block C first".to_owned()),
            },
        )
        .await
        .expect("redirection");

    assert_eq!(child.task.parent_task(), Some(source.task.id()));
    assert_eq!(child.task.initiator(), uid(&org.head));
    assert_eq!(child.task.resolution(), "Review shelf block C first");

    // Both branches stay live and independently visible.
    let chain = org
        .board
        .redirections(&org.director, source.task.id())
        .await
        .expect("children listing");
    assert_eq!(chain.len(), 1);

    let employee_view = org
        .board
        .on_execution(&org.employee)
        .await
        .expect("execution view");
    assert_eq!(employee_view.len(), 1);
    assert_eq!(employee_view[0].task.id(), child.task.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn window_blocks_late_redirection_for_delegators_only() {
    let org = world().await;
    let source = org
        .board
        .create_task(
            &org.deputy_director,
            request("Last-minute request", vec![uid(&org.head)], date(2026, 3, 4)),
        )
        .await
        .expect("source task");

    let late = org
        .board
        .redirect_task(
            &org.head,
            source.task.id(),
            RedirectRequest {
                executors: vec![uid(&org.employee)],
                execution_date: Some(date(2026, 3, 4)),
                resolution: None,
            },
        )
        .await;
    assert!(matches!(late, Err(TaskBoardError::NotFound(_))));

    org.board
        .redirect_task(
            &org.director,
            source.task.id(),
            RedirectRequest {
                executors: vec![uid(&org.employee)],
                execution_date: Some(date(2026, 3, 4)),
                resolution: None,
            },
        )
        .await
        .expect("privileged redirect inside window");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn parent_is_protected_while_children_exist() {
    let org = world().await;
    let source = org
        .board
        .create_task(
            &org.deputy_director,
            request("Branching work", vec![uid(&org.head)], date(2026, 4, 1)),
        )
        .await
        .expect("source task");
    org.board
        .redirect_task(
            &org.head,
            source.task.id(),
            RedirectRequest {
                executors: vec![uid(&org.employee)],
                execution_date: Some(date(2026, 3, 25)),
                resolution: None,
            },
        )
        .await
        .expect("redirection");

    let blocked = org
        .board
        .delete_task(&org.deputy_director, source.task.id())
        .await;
    assert!(matches!(blocked, Err(TaskBoardError::RedirectionsExist(_))));
}
