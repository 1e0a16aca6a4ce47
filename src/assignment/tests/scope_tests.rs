//! Tests for the role-based scoping and delegation policy.

use super::support::date;
use crate::assignment::domain::{
    scope, ExecutorRejection, Task, TaskDraft, TaskVisibility,
};
use crate::directory::domain::{
    Actor, DepartmentId, EmailAddress, Role, User, UserId, UserProfile,
};
use mockable::DefaultClock;
use rstest::rstest;

fn person(role: Role, department: Option<DepartmentId>) -> User {
    User::new(UserProfile {
        email: EmailAddress::new(format!("{}@works.test", UserId::new())).expect("valid email"),
        first_name: "Test".to_owned(),
        last_name: "Person".to_owned(),
        role,
        department,
        chat_handle: None,
        is_admin: false,
    })
    .expect("valid profile")
}

fn actor_of(user: &User) -> Actor {
    Actor::from_user(user)
}

#[rstest]
#[case(Role::Director, true)]
#[case(Role::Administrator, true)]
#[case(Role::DeputyDirector, false)]
#[case(Role::HeadOfDepartment, false)]
#[case(Role::Employee, false)]
fn visibility_is_unrestricted_only_for_privileged_roles(
    #[case] role: Role,
    #[case] unrestricted: bool,
) {
    let user = person(role, None);
    let visibility = scope::visibility(&actor_of(&user));
    assert_eq!(matches!(visibility, TaskVisibility::Everything), unrestricted);
}

#[rstest]
fn employee_sees_only_executed_tasks() {
    let user = person(Role::Employee, None);
    assert_eq!(
        scope::visibility(&actor_of(&user)),
        TaskVisibility::ExecutingOnly(user.id())
    );
}

#[rstest]
fn delegators_see_initiated_and_executed_tasks() {
    let user = person(Role::HeadOfDepartment, Some(DepartmentId::new()));
    assert_eq!(
        scope::visibility(&actor_of(&user)),
        TaskVisibility::InitiatedOrExecuting(user.id())
    );
}

#[rstest]
fn admin_flag_grants_unrestricted_visibility_regardless_of_role() {
    let user = User::new(UserProfile {
        email: EmailAddress::new("flagged@works.test").expect("valid email"),
        first_name: "Test".to_owned(),
        last_name: "Person".to_owned(),
        role: Role::Employee,
        department: None,
        chat_handle: None,
        is_admin: true,
    })
    .expect("valid profile");
    assert_eq!(scope::visibility(&actor_of(&user)), TaskVisibility::Everything);
}

#[rstest]
fn employees_hold_no_mutation_scope() {
    let user = person(Role::Employee, None);
    assert_eq!(scope::mutability(&actor_of(&user)), None);
}

#[rstest]
fn delegators_mutate_only_initiated_tasks() {
    let user = person(Role::DeputyHeadOfDepartment, Some(DepartmentId::new()));
    assert_eq!(
        scope::mutability(&actor_of(&user)),
        Some(TaskVisibility::InitiatedOnly(user.id()))
    );
}

#[rstest]
fn visibility_admits_matches_task_membership() {
    let initiator = UserId::new();
    let executor = UserId::new();
    let stranger = UserId::new();
    let task = Task::new(
        TaskDraft {
            title: "Check admittance".to_owned(),
            number: None,
            group: None,
            initiator,
            resolution: "Scoping check".to_owned(),
            parent_task: None,
            executors: vec![executor],
            execution_date: date(2999, 1, 1),
            brief: None,
        },
        &DefaultClock,
    )
    .expect("valid draft");

    assert!(TaskVisibility::Everything.admits(&task));
    assert!(TaskVisibility::InitiatedOrExecuting(initiator).admits(&task));
    assert!(TaskVisibility::InitiatedOrExecuting(executor).admits(&task));
    assert!(!TaskVisibility::InitiatedOrExecuting(stranger).admits(&task));
    assert!(TaskVisibility::InitiatedOnly(initiator).admits(&task));
    assert!(!TaskVisibility::InitiatedOnly(executor).admits(&task));
    assert!(TaskVisibility::ExecutingOnly(executor).admits(&task));
    assert!(!TaskVisibility::ExecutingOnly(initiator).admits(&task));
}

#[rstest]
fn deputy_director_may_name_anyone_but_directors() {
    let deputy = person(Role::DeputyDirector, None);
    let actor = actor_of(&deputy);
    let director = person(Role::Director, None);
    let head = person(Role::HeadOfDepartment, Some(DepartmentId::new()));

    assert_eq!(
        scope::may_assign(&actor, &director),
        Err(ExecutorRejection::DirectorExcluded)
    );
    assert_eq!(scope::may_assign(&actor, &head), Ok(()));
}

#[rstest]
fn head_is_confined_to_own_department() {
    let dept = DepartmentId::new();
    let head = person(Role::HeadOfDepartment, Some(dept));
    let actor = actor_of(&head);
    let member = person(Role::Employee, Some(dept));
    let foreigner = person(Role::Employee, Some(DepartmentId::new()));

    assert_eq!(scope::may_assign(&actor, &member), Ok(()));
    assert_eq!(
        scope::may_assign(&actor, &foreigner),
        Err(ExecutorRejection::OutsideDepartment)
    );
    assert_eq!(
        scope::may_assign(&actor, &head),
        Err(ExecutorRejection::SelfAssignment)
    );
}

#[rstest]
fn deputy_head_may_name_only_rank_and_file() {
    let dept = DepartmentId::new();
    let deputy = person(Role::DeputyHeadOfDepartment, Some(dept));
    let actor = actor_of(&deputy);
    let employee = person(Role::Employee, Some(dept));
    let head = person(Role::HeadOfDepartment, Some(dept));

    assert_eq!(scope::may_assign(&actor, &employee), Ok(()));
    assert_eq!(
        scope::may_assign(&actor, &head),
        Err(ExecutorRejection::NotRankAndFile)
    );
}

#[rstest]
fn employees_hold_no_delegation_authority() {
    let employee = person(Role::Employee, Some(DepartmentId::new()));
    let peer = person(Role::Employee, Some(DepartmentId::new()));
    assert_eq!(
        scope::may_assign(&actor_of(&employee), &peer),
        Err(ExecutorRejection::NoDelegationAuthority)
    );
}

#[rstest]
fn director_and_admin_may_name_anyone() {
    let director = person(Role::Director, None);
    let other_director = person(Role::Director, None);
    assert_eq!(
        scope::may_assign(&actor_of(&director), &other_director),
        Ok(())
    );

    let admin = person(Role::Administrator, None);
    assert_eq!(scope::may_assign(&actor_of(&admin), &director), Ok(()));
}

#[rstest]
#[case(Role::Director, true)]
#[case(Role::DeputyDirector, true)]
#[case(Role::HeadOfDepartment, true)]
#[case(Role::DeputyHeadOfDepartment, true)]
#[case(Role::Administrator, true)]
#[case(Role::Employee, false)]
fn only_delegating_roles_may_initiate(#[case] role: Role, #[case] allowed: bool) {
    let user = person(role, None);
    assert_eq!(scope::may_initiate(&actor_of(&user)), allowed);
}
