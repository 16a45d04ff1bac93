use super::*;
use crate::output::buffer_sink;
use pretty_assertions::assert_eq;

#[test]
fn standard_slots_are_open() {
    let table = StreamTable::new();
    for id in [StreamId::STDIN, StreamId::STDOUT, StreamId::STDERR] {
        assert!(table.is_open(id));
    }
    assert!(!table.contains(StreamId::new(3)));
}

#[test]
fn stdout_writes_reach_the_sink() {
    let out = buffer_sink();
    let mut table = StreamTable::new();
    assert_eq!(table.write(StreamId::STDOUT, b"hello", &out), 5);
    assert!(table.flush(StreamId::STDOUT, &out));
    assert_eq!(out.output(), "hello");
}

#[test]
fn write_then_read_back_a_file() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let path = dir.path().join("data.txt");
    let out = buffer_sink();
    let mut table = StreamTable::new();

    let f = table.allocate();
    assert!(!table.is_open(f));
    assert!(table.open(f, &path, "w"));
    assert_eq!(table.write(f, b"abcdef", &out), 6);
    assert!(table.close(f));
    assert!(!table.close(f));

    assert!(table.open(f, &path, "rb"));
    assert_eq!(table.read(f, 4), b"abcd");
    assert_eq!(table.read(f, 10), b"ef");
    assert_eq!(table.read(f, 10), b"");
}

#[test]
fn append_mode_keeps_contents() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let path = dir.path().join("log.txt");
    let out = buffer_sink();
    let mut table = StreamTable::new();
    let f = table.allocate();

    assert!(table.open(f, &path, "w"));
    table.write(f, b"one ", &out);
    assert!(table.reopen(f, &path, "a"));
    table.write(f, b"two", &out);
    table.close(f);

    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(text, "one two");
}

#[test]
fn open_failures_return_false() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let mut table = StreamTable::new();
    let f = table.allocate();
    assert!(!table.open(f, &dir.path().join("missing.txt"), "r"));
    assert!(!table.open(f, &dir.path().join("x.txt"), "q"));
    assert!(!table.is_open(f));
    assert!(!table.open(StreamId::new(40), &dir.path().join("x.txt"), "w"));
}

#[test]
fn closed_stream_io_is_empty() {
    let out = buffer_sink();
    let mut table = StreamTable::new();
    let f = table.allocate();
    assert_eq!(table.write(f, b"lost", &out), 0);
    assert!(table.read(f, 8).is_empty());
    assert!(!table.flush(f, &out));
}

#[test]
fn orientation_is_decided_once() {
    let mut table = StreamTable::new();
    assert_eq!(table.wide(StreamId::STDOUT, 0), 0);
    assert_eq!(table.wide(StreamId::STDOUT, -3), -1);
    assert_eq!(table.wide(StreamId::STDOUT, 5), -1);
    assert_eq!(table.wide(StreamId::STDERR, 2), 1);
}
