//! Shared helpers for in-memory end-to-end tests.

use chrono::{DateTime, Local, NaiveDate, Utc};
use mockable::Clock;
use remit::assignment::{
    adapters::memory::{InMemoryGroupRepository, InMemoryTaskRepository},
    domain::UrgentWindow,
    services::{GroupCatalogService, NewTaskRequest, TaskBoardService},
};
use remit::directory::{
    adapters::memory::{InMemoryDepartmentRepository, InMemoryUserRepository},
    domain::{Actor, Caller, DepartmentId, EmailAddress, Role, User, UserId, UserProfile},
    services::DirectoryService,
};
use std::sync::Arc;

/// Clock pinned to noon UTC of a chosen day.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(today: NaiveDate) -> Self {
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

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// The day every world is pinned to.
pub fn today() -> NaiveDate {
    date(2026, 3, 2)
}

pub type Board = TaskBoardService<
    InMemoryTaskRepository,
    InMemoryGroupRepository,
    InMemoryUserRepository,
    FixedClock,
>;
pub type Catalog = GroupCatalogService<InMemoryGroupRepository, InMemoryTaskRepository>;
pub type Directory =
    DirectoryService<InMemoryUserRepository, InMemoryDepartmentRepository, InMemoryTaskRepository>;

/// A small organisation wired end to end over in-memory stores.
pub struct World {
    pub directory: Directory,
    pub board: Board,
    pub catalog: Catalog,
    pub records: DepartmentId,
    pub admin: Caller,
    pub director: Caller,
    pub deputy_director: Caller,
    pub head: Caller,
    pub employee: Caller,
    pub outsider: Caller,
}

pub fn uid(caller: &Caller) -> UserId {
    caller.actor().expect("authenticated caller").user_id()
}

pub fn profile(email: &str, role: Role, department: Option<DepartmentId>) -> UserProfile {
    let last_name = email.split('@').next().expect("local part").to_owned();
    UserProfile {
        email: EmailAddress::new(email).expect("valid email"),
        first_name: "Test".to_owned(),
        last_name,
        role,
        department,
        chat_handle: None,
        is_admin: false,
    }
}

pub fn caller_of(user: &User) -> Caller {
    Caller::Authenticated(Actor::from_user(user))
}

pub async fn world() -> World {
    let users = Arc::new(InMemoryUserRepository::new());
    let departments = Arc::new(InMemoryDepartmentRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let groups = Arc::new(InMemoryGroupRepository::new());

    let directory = DirectoryService::new(
        Arc::clone(&users),
        Arc::clone(&departments),
        Arc::clone(&tasks),
    );
    let board = TaskBoardService::new(
        Arc::clone(&tasks),
        Arc::clone(&groups),
        Arc::clone(&users),
        Arc::new(FixedClock::at(today())),
        UrgentWindow::default(),
    );
    let catalog = GroupCatalogService::new(Arc::clone(&groups), Arc::clone(&tasks));

    // The first administrator account bootstraps the rest of the org.
    let bootstrap = Caller::Authenticated(Actor::new(
        UserId::new(),
        Role::Administrator,
        None,
        true,
    ));
    let admin = directory
        .register_user(&bootstrap, {
            let mut seed = profile("admin@works.test", Role::Administrator, None);
            seed.is_admin = true;
            seed
        })
        .await
        .expect("admin account");
    let admin = caller_of(&admin);

    let records = directory
        .create_department(&admin, "Records", None)
        .await
        .expect("records department")
        .id();
    let other = directory
        .create_department(&admin, "Inspections", None)
        .await
        .expect("inspections department")
        .id();

    let director = directory
        .register_user(&admin, profile("director@works.test", Role::Director, None))
        .await
        .expect("director account");
    let deputy_director = directory
        .register_user(
            &admin,
            profile("deputy.director@works.test", Role::DeputyDirector, None),
        )
        .await
        .expect("deputy director account");
    let head = directory
        .register_user(
            &admin,
            profile("head@works.test", Role::HeadOfDepartment, Some(records)),
        )
        .await
        .expect("head account");
    let employee = directory
        .register_user(
            &admin,
            profile("employee@works.test", Role::Employee, Some(records)),
        )
        .await
        .expect("employee account");
    let outsider = directory
        .register_user(
            &admin,
            profile("outsider@works.test", Role::Employee, Some(other)),
        )
        .await
        .expect("outsider account");

    World {
        directory,
        board,
        catalog,
        records,
        admin,
        director: caller_of(&director),
        deputy_director: caller_of(&deputy_director),
        head: caller_of(&head),
        employee: caller_of(&employee),
        outsider: caller_of(&outsider),
    }
}

pub fn request(title: &str, executors: Vec<UserId>, due: NaiveDate) -> NewTaskRequest {
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
