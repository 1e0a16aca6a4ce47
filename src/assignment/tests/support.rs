//! Shared fixtures for assignment tests.

use crate::assignment::{
    adapters::memory::{InMemoryGroupRepository, InMemoryTaskRepository},
    domain::{Task, TaskDraft, UrgentWindow},
    ports::repository::TaskRepository,
    services::{NewTaskRequest, TaskBoardService},
};
use crate::directory::{
    adapters::memory::InMemoryUserRepository,
    domain::{Actor, Caller, DepartmentId, EmailAddress, Role, User, UserId, UserProfile},
    ports::repository::UserRepository,
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;
use std::sync::Arc;

pub(crate) type TestBoard = TaskBoardService<
    InMemoryTaskRepository,
    InMemoryGroupRepository,
    InMemoryUserRepository,
    FixedClock,
>;

/// Clock pinned to noon UTC of a chosen day.
#[derive(Debug, Clone)]
pub(crate) struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub(crate) fn at(today: NaiveDate) -> Self {
        let noon = today.and_hms_opt(12, 0, 0).expect("valid time of day");
        Self {
            now: noon.and_utc(),
        }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn uid(caller: &Caller) -> UserId {
    caller.actor().expect("authenticated caller").user_id()
}

/// Full cast of roles over two departments, wired to one board service.
pub(crate) struct Board {
    pub service: TestBoard,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub groups: Arc<InMemoryGroupRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub dept: DepartmentId,
    pub other_dept: DepartmentId,
    pub admin: Caller,
    pub director: Caller,
    pub deputy_director: Caller,
    pub head: Caller,
    pub deputy_head: Caller,
    pub employee: Caller,
    pub colleague: Caller,
    pub outsider: Caller,
}

pub(crate) async fn board(today: NaiveDate) -> Board {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let groups = Arc::new(InMemoryGroupRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let dept = DepartmentId::new();
    let other_dept = DepartmentId::new();

    let admin = seed_user(&users, "admin@works.test", Role::Administrator, None, true).await;
    let director = seed_user(&users, "director@works.test", Role::Director, None, false).await;
    let deputy_director = seed_user(
        &users,
        "deputy.director@works.test",
        Role::DeputyDirector,
        None,
        false,
    )
    .await;
    let head = seed_user(
        &users,
        "head@works.test",
        Role::HeadOfDepartment,
        Some(dept),
        false,
    )
    .await;
    let deputy_head = seed_user(
        &users,
        "deputy.head@works.test",
        Role::DeputyHeadOfDepartment,
        Some(dept),
        false,
    )
    .await;
    let employee = seed_user(
        &users,
        "employee@works.test",
        Role::Employee,
        Some(dept),
        false,
    )
    .await;
    let colleague = seed_user(
        &users,
        "colleague@works.test",
        Role::Employee,
        Some(dept),
        false,
    )
    .await;
    let outsider = seed_user(
        &users,
        "outsider@works.test",
        Role::Employee,
        Some(other_dept),
        false,
    )
    .await;

    let service = TaskBoardService::new(
        Arc::clone(&tasks),
        Arc::clone(&groups),
        Arc::clone(&users),
        Arc::new(FixedClock::at(today)),
        UrgentWindow::days(3),
    );

    Board {
        service,
        tasks,
        groups,
        users,
        dept,
        other_dept,
        admin,
        director,
        deputy_director,
        head,
        deputy_head,
        employee,
        colleague,
        outsider,
    }
}

pub(crate) async fn seed_user(
    users: &InMemoryUserRepository,
    email: &str,
    role: Role,
    department: Option<DepartmentId>,
    is_admin: bool,
) -> Caller {
    let last_name = email.split('@').next().expect("local part").to_owned();
    let user = User::new(UserProfile {
        email: EmailAddress::new(email).expect("valid email"),
        first_name: "Test".to_owned(),
        last_name,
        role,
        department,
        chat_handle: None,
        is_admin,
    })
    .expect("valid profile");
    users.insert(&user).await.expect("insert user");
    Caller::Authenticated(Actor::from_user(&user))
}

pub(crate) fn request(title: &str, executors: Vec<UserId>, due: NaiveDate) -> NewTaskRequest {
    NewTaskRequest {
        title: title.to_owned(),
        number: None,
        group: None,
        resolution: "Please handle this".to_owned(),
        executors,
        execution_date: due,
        brief: None,
    }
}

/// Inserts a task directly into the store with a chosen creation day,
/// bypassing the service so overdue states can be staged.
pub(crate) async fn seed_task(
    board: &Board,
    initiator: &Caller,
    executors: Vec<UserId>,
    created: NaiveDate,
    due: NaiveDate,
    title: &str,
) -> Task {
    let draft = TaskDraft {
        title: title.to_owned(),
        number: None,
        group: None,
        initiator: uid(initiator),
        resolution: "Please handle this".to_owned(),
        parent_task: None,
        executors,
        execution_date: due,
        brief: None,
    };
    let task = Task::new(draft, &FixedClock::at(created)).expect("valid draft");
    board.tasks.insert(&task).await.expect("insert task");
    task
}
