//! # pgoq-core
//!
//! A type-safe, fluent SQL query builder targeting PostgreSQL.
//!
//! The builder API uses Rust's type system to reject invalid statements at
//! compile time — a `SELECT` with no `FROM` never type-checks, and a
//! comparison between a string field and a numeric literal never type-checks
//! either:
//!
//! ```rust
//! use pgoq_core::expr::{ExprOps, StringExpr, TypedExpr};
//! use pgoq_core::schema::Table;
//! use pgoq_core::stmt::Select;
//!
//! let users = Table::new("users");
//! let (sql, params) = Select::new(vec![StringExpr::field(&users, "name").into_expr()])
//!     .from(Box::new(users.clone()))
//!     .where_clause(vec![StringExpr::field(&users, "name").eq("alice").into_expr()])
//!     .build();
//!
//! assert_eq!(sql, "SELECT \"users\".name FROM public.users WHERE \"users\".name = $1");
//! assert_eq!(params.len(), 1);
//!
//! // This would NOT compile — a SELECT with no FROM has no `.build()` method:
//! // let query = Select::new(vec![]).build();
//! ```
//!
//! All literal values are parameterized through [`builder::Builder`], never
//! interpolated into the generated SQL text.

pub mod builder;
pub mod dialect;
pub mod exec;
pub mod expr;
pub mod func;
pub mod null;
pub mod schema;
pub mod stmt;
pub mod value;

pub use builder::{Builder, Renderable};
pub use dialect::Dialect;
pub use exec::{Execute, Fetch};
pub use null::Null;
pub use schema::{FieldRef, Selectable, Table};
pub use stmt::{Delete, Insert, Select, Update};
pub use value::{IntoSqlValue, SqlValue};
