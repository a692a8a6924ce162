use crate::model::{Expr, Term, UnknownCollection};
use crate::policy::CompileConfig;

pub fn users() -> UnknownCollection {
    UnknownCollection::parse("data.users").expect("valid unknown")
}

/// `data.users[_].<field>`, with the iteration variable named the way the engine does.
pub fn users_field(field: &str) -> Term {
    Term::Ref(vec![
        Term::var("data"),
        Term::string("users"),
        Term::var("$01"),
        Term::string(field),
    ])
}

pub fn eq(lhs: Term, rhs: Term) -> Expr {
    Expr::call("eq", vec![lhs, rhs])
}

pub fn config() -> CompileConfig {
    CompileConfig::new(users())
}
