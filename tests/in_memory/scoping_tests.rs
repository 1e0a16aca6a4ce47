//! Role-based visibility and information hiding, end to end.

use super::helpers::{date, request, uid, world};
use remit::assignment::services::{TaskBoardError, TaskQuery};
use remit::directory::domain::Caller;
use remit::directory::services::DirectoryError;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_role_sees_its_own_slice() {
    let org = world().await;
    org.board
        .create_task(
            &org.head,
            request("Records desk work", vec![uid(&org.employee)], date(2026, 3, 20)),
        )
        .await
        .expect("records task");
    org.board
        .create_task(
            &org.deputy_director,
            request("Inspections desk work", vec![uid(&org.outsider)], date(2026, 3, 21)),
        )
        .await
        .expect("inspections task");

    for privileged in [&org.admin, &org.director] {
        let all = org
            .board
            .list_tasks(privileged, TaskQuery::default())
            .await
            .expect("privileged listing");
        assert_eq!(all.len(), 2);
    }

    let head_view = org
        .board
        .list_tasks(&org.head, TaskQuery::default())
        .await
        .expect("head listing");
    assert_eq!(head_view.len(), 1);
    assert_eq!(head_view[0].task.title(), "Records desk work");

    let employee_view = org
        .board
        .list_tasks(&org.employee, TaskQuery::default())
        .await
        .expect("employee listing");
    assert_eq!(employee_view.len(), 1);

    let outsider_view = org
        .board
        .list_tasks(&org.outsider, TaskQuery::default())
        .await
        .expect("outsider listing");
    assert_eq!(outsider_view.len(), 1);
    assert_eq!(outsider_view[0].task.title(), "Inspections desk work");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_tasks_read_as_not_found() {
    let org = world().await;
    let created = org
        .board
        .create_task(
            &org.head,
            request("Internal matter", vec![uid(&org.employee)], date(2026, 3, 20)),
        )
        .await
        .expect("task creation");

    let hidden = org.board.get_task(&org.outsider, created.task.id()).await;
    assert!(matches!(hidden, Err(TaskBoardError::NotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn employees_hold_no_delegation_rights() {
    let org = world().await;
    let result = org
        .board
        .create_task(
            &org.employee,
            request("Sideways delegation", vec![uid(&org.outsider)], date(2026, 3, 20)),
        )
        .await;
    assert!(matches!(result, Err(TaskBoardError::Forbidden)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_callers_are_rejected_everywhere() {
    let org = world().await;

    let board = org
        .board
        .list_tasks(&Caller::Anonymous, TaskQuery::default())
        .await;
    assert!(matches!(board, Err(TaskBoardError::Unauthenticated)));

    let directory = org.directory.list_users(&Caller::Anonymous).await;
    assert!(matches!(directory, Err(DirectoryError::Unauthenticated)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn directory_reads_are_self_scoped_for_non_admins() {
    let org = world().await;

    let own = org
        .directory
        .get_user(&org.employee, uid(&org.employee))
        .await
        .expect("own account");
    assert_eq!(own.id(), uid(&org.employee));

    let foreign = org
        .directory
        .get_user(&org.employee, uid(&org.head))
        .await;
    assert!(matches!(foreign, Err(DirectoryError::UserNotFound(_))));

    let listing = org
        .directory
        .list_users(&org.employee)
        .await
        .expect("self listing");
    assert_eq!(listing.len(), 1);
}
