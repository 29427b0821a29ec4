mod dedup;
mod happy_path;
mod lost_events;
mod persistence;
