mod admin;
mod queue;
