//! `PostgreSQL` repository implementations for directory storage.

use super::{
    models::{DepartmentRow, NewDepartmentRow, NewUserRow, UserRow},
    schema::{departments, users},
};
use crate::directory::{
    domain::{
        Department, DepartmentId, EmailAddress, PersistedDepartmentData, PersistedUserData, Role,
        User, UserId,
    },
    ports::{
        DepartmentRepository, DepartmentRepositoryError, DepartmentRepositoryResult,
        UserRepository, UserRepositoryError, UserRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by directory adapters.
pub type DirectoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: DirectoryPgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

fn to_user_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        email: user.email().as_str().to_owned(),
        first_name: user.first_name().to_owned(),
        last_name: user.last_name().to_owned(),
        role: user.role().as_str().to_owned(),
        department_id: user.department().map(DepartmentId::into_inner),
        chat_handle: user.chat_handle().map(str::to_owned),
        is_admin: user.is_admin(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        email,
        first_name,
        last_name,
        role: persisted_role,
        department_id,
        chat_handle,
        is_admin,
    } = row;

    let email = EmailAddress::new(email).map_err(UserRepositoryError::persistence)?;
    let role =
        Role::try_from(persisted_role.as_str()).map_err(UserRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(id),
        email,
        first_name,
        last_name,
        role,
        department: department_id.map(DepartmentId::from_uuid),
        chat_handle,
        is_admin,
    }))
}

fn map_user_unique_violation(err: DieselError, email: &EmailAddress) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserRepositoryError::DuplicateEmail(email.clone())
        }
        _ => UserRepositoryError::persistence(err),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &User) -> UserRepositoryResult<()> {
        let email = user.email().clone();
        let new_row = to_user_row(user);
        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_user_unique_violation(err, &email))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let email = user.email().clone();
        let row = to_user_row(user);
        self.run_blocking(move |connection| {
            let updated = diesel::update(users::table.filter(users::id.eq(user_id.into_inner())))
                .set(&row)
                .execute(connection)
                .map_err(|err| map_user_unique_violation(err, &email))?;
            if updated == 0 {
                return Err(UserRepositoryError::NotFound(user_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .order((users::last_name.asc(), users::first_name.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn list_by_department(
        &self,
        department: DepartmentId,
    ) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::department_id.eq(department.into_inner()))
                .order((users::last_name.asc(), users::first_name.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(users::table.filter(users::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn clear_department(&self, department: DepartmentId) -> UserRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::update(
                users::table.filter(users::department_id.eq(department.into_inner())),
            )
            .set(users::department_id.eq(None::<uuid::Uuid>))
            .execute(connection)
            .map_err(UserRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}

/// `PostgreSQL`-backed department repository.
#[derive(Debug, Clone)]
pub struct PostgresDepartmentRepository {
    pool: DirectoryPgPool,
}

impl PostgresDepartmentRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DepartmentRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DepartmentRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DepartmentRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DepartmentRepositoryError::persistence)?
    }
}

fn to_department_row(department: &Department) -> NewDepartmentRow {
    NewDepartmentRow {
        id: department.id().into_inner(),
        name: department.name().to_owned(),
        curator_id: department.curator().map(UserId::into_inner),
    }
}

fn row_to_department(row: DepartmentRow) -> Department {
    Department::from_persisted(PersistedDepartmentData {
        id: DepartmentId::from_uuid(row.id),
        name: row.name,
        curator: row.curator_id.map(UserId::from_uuid),
    })
}

fn map_department_unique_violation(err: DieselError, name: &str) -> DepartmentRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DepartmentRepositoryError::DuplicateName(name.to_owned())
        }
        _ => DepartmentRepositoryError::persistence(err),
    }
}

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn insert(&self, department: &Department) -> DepartmentRepositoryResult<()> {
        let name = department.name().to_owned();
        let new_row = to_department_row(department);
        self.run_blocking(move |connection| {
            diesel::insert_into(departments::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_department_unique_violation(err, &name))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, department: &Department) -> DepartmentRepositoryResult<()> {
        let department_id = department.id();
        let name = department.name().to_owned();
        let row = to_department_row(department);
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                departments::table.filter(departments::id.eq(department_id.into_inner())),
            )
            .set(&row)
            .execute(connection)
            .map_err(|err| map_department_unique_violation(err, &name))?;
            if updated == 0 {
                return Err(DepartmentRepositoryError::NotFound(department_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: DepartmentId,
    ) -> DepartmentRepositoryResult<Option<Department>> {
        self.run_blocking(move |connection| {
            let row = departments::table
                .filter(departments::id.eq(id.into_inner()))
                .select(DepartmentRow::as_select())
                .first::<DepartmentRow>(connection)
                .optional()
                .map_err(DepartmentRepositoryError::persistence)?;
            Ok(row.map(row_to_department))
        })
        .await
    }

    async fn list_all(&self) -> DepartmentRepositoryResult<Vec<Department>> {
        self.run_blocking(move |connection| {
            let rows = departments::table
                .order(departments::name.asc())
                .select(DepartmentRow::as_select())
                .load::<DepartmentRow>(connection)
                .map_err(DepartmentRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_department).collect())
        })
        .await
    }

    async fn delete(&self, id: DepartmentId) -> DepartmentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(departments::table.filter(departments::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(DepartmentRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(DepartmentRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn clear_curator(&self, curator: UserId) -> DepartmentRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::update(
                departments::table.filter(departments::curator_id.eq(curator.into_inner())),
            )
            .set(departments::curator_id.eq(None::<uuid::Uuid>))
            .execute(connection)
            .map_err(DepartmentRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}
