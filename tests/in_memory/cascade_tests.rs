//! Referential actions when users, departments, and groups are removed.

use super::helpers::{date, profile, request, uid, world};
use remit::assignment::services::{RedirectRequest, TaskBoardError, TaskQuery};
use remit::directory::domain::Role;
use remit::directory::services::DirectoryError;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_user_cascades_their_initiated_tasks() {
    let org = world().await;
    org.board
        .create_task(
            &org.head,
            request("Doomed with its initiator", vec![uid(&org.employee)], date(2026, 3, 20)),
        )
        .await
        .expect("head task");
    org.board
        .create_task(
            &org.deputy_director,
            request("Survives the removal", vec![uid(&org.head), uid(&org.employee)], date(2026, 3, 21)),
        )
        .await
        .expect("directorate task");

    org.directory
        .delete_user(&org.admin, uid(&org.head))
        .await
        .expect("user removal");

    let remaining = org
        .board
        .list_tasks(&org.director, TaskQuery::default())
        .await
        .expect("listing");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].task.title(), "Survives the removal");
    // The removed user is stripped from surviving executor sets.
    assert_eq!(remaining[0].task.executors(), &[uid(&org.employee)]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removal_is_blocked_while_foreign_redirections_point_at_initiated_tasks() {
    let org = world().await;
    let source = org
        .board
        .create_task(
            &org.deputy_director,
            request("Forked work", vec![uid(&org.head)], date(2026, 4, 1)),
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

    // The deputy director's task has a child initiated by the head, so the
    // deputy director cannot be removed while the fork exists.
    let blocked = org
        .directory
        .delete_user(&org.admin, uid(&org.deputy_director))
        .await;
    assert!(matches!(blocked, Err(DirectoryError::RedirectionsExist(_))));

    // Removing the head first takes the child with it and unblocks.
    org.directory
        .delete_user(&org.admin, uid(&org.head))
        .await
        .expect("remove redirecting user");
    org.directory
        .delete_user(&org.admin, uid(&org.deputy_director))
        .await
        .expect("remove original initiator");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_department_detaches_members_and_curator_stays_elsewhere() {
    let org = world().await;
    org.directory
        .assign_curator(&org.admin, org.records, Some(uid(&org.director)))
        .await
        .expect("curator assignment");

    org.directory
        .delete_department(&org.admin, org.records)
        .await
        .expect("department removal");

    let head = org
        .directory
        .get_user(&org.admin, uid(&org.head))
        .await
        .expect("head survives");
    assert_eq!(head.department(), None);
    let employee = org
        .directory
        .get_user(&org.admin, uid(&org.employee))
        .await
        .expect("employee survives");
    assert_eq!(employee.department(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_curator_clears_the_department_reference() {
    let org = world().await;
    let curator = org
        .directory
        .register_user(
            &org.admin,
            profile("curator@works.test", Role::DeputyDirector, None),
        )
        .await
        .expect("curator account");
    org.directory
        .assign_curator(&org.admin, org.records, Some(curator.id()))
        .await
        .expect("curator assignment");

    org.directory
        .delete_user(&org.admin, curator.id())
        .await
        .expect("curator removal");

    let department = org
        .directory
        .get_department(&org.admin, org.records)
        .await
        .expect("department survives");
    assert_eq!(department.curator(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_group_clears_task_categories() {
    let org = world().await;
    let group = org
        .catalog
        .create_group(&org.admin, "Transient")
        .await
        .expect("group");

    let mut req = request("Categorised", vec![uid(&org.employee)], date(2026, 3, 20));
    req.group = Some(group.id());
    let created = org
        .board
        .create_task(&org.head, req)
        .await
        .expect("task creation");

    org.catalog
        .delete_group(&org.admin, group.id())
        .await
        .expect("group removal");

    let reloaded = org
        .board
        .get_task(&org.head, created.task.id())
        .await
        .expect("task survives");
    assert_eq!(reloaded.task.group(), None);

    let by_group = org
        .board
        .list_tasks(
            &org.director,
            TaskQuery {
                groups: vec![group.id()],
                ..TaskQuery::default()
            },
        )
        .await
        .expect("filtered listing");
    assert!(by_group.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_tasks_disappear_from_every_view(#[values(true, false)] as_admin: bool) {
    let org = world().await;
    let created = org
        .board
        .create_task(
            &org.head,
            request("Fleeting", vec![uid(&org.employee)], date(2026, 3, 20)),
        )
        .await
        .expect("task creation");

    let deleter = if as_admin { &org.admin } else { &org.head };
    org.board
        .delete_task(deleter, created.task.id())
        .await
        .expect("deletion");

    let employee_view = org
        .board
        .on_execution(&org.employee)
        .await
        .expect("execution view");
    assert!(employee_view.is_empty());

    let direct = org.board.get_task(&org.director, created.task.id()).await;
    assert!(matches!(direct, Err(TaskBoardError::NotFound(_))));
}
