// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{collections::HashMap, thread, time::Duration};

use pretty_assertions::assert_eq;
use pretty_report::{
    cli::Coloring,
    event::{RunFinished, RunStarted, SourceLocation},
    settings::DISABLE_FULL_SKIP_MESSAGES,
    writer::{out::WritableString, TermWidth},
    Config, OutcomeKind, RunReportWriter, TestRecord, Writer as _,
};

const START: &str = "     🧪 Calc.Tests:  START   \n";

fn writer(coloring: Coloring) -> RunReportWriter<WritableString> {
    RunReportWriter::new(
        WritableString::default(),
        Config {
            coloring,
            ..Config::default()
                .with_width(TermWidth::Fixed(80))
                .with_root("/work/repo")
        },
    )
}

fn started() -> RunStarted {
    RunStarted {
        sources: vec!["/work/repo/bin/Calc.Tests.dll".into()],
        ..RunStarted::default()
    }
}

fn finished(total_executed: u64) -> RunFinished {
    RunFinished {
        total_executed,
        elapsed: Duration::from_millis(1_234),
        ..RunFinished::default()
    }
}

fn failure() -> TestRecord {
    TestRecord::new("Calc.Tests.Divides", OutcomeKind::Failed)
        .with_duration(Duration::from_millis(4))
        .with_error_message("System.Exception : boom!")
        .with_stack_trace(
            "   at Calc.Tests.Helper()\n   \
             at Calc.Tests.Divides() in /work/repo/Tests/Calc.cs:line 42",
        )
        .with_location(SourceLocation::new("/work/repo/Tests/Calc.cs", 40))
}

fn run_scenario(w: &RunReportWriter<WritableString>) {
    w.on_run_start(started()).unwrap();
    w.on_result(
        TestRecord::new("Calc.Tests.Adds", OutcomeKind::Passed)
            .with_duration(Duration::from_millis(10)),
    )
    .unwrap();
    w.on_result(failure()).unwrap();
    w.on_result(
        TestRecord::new("Calc.Tests.Rounds", OutcomeKind::Skipped)
            .with_messages(["reason"]),
    )
    .unwrap();
    w.on_run_complete(finished(3)).unwrap();
}

#[test]
fn end_to_end() {
    let w = writer(Coloring::Never);

    run_scenario(&w);
    let out = w.into_inner().0;

    assert!(out.starts_with(START), "{out}");
    assert!(!out.contains("Calc.Tests.Adds"));
    assert!(out.contains(
        " ⚡\u{fe0f} FAIL  Calc.Tests.Divides\n\
         \x20         System.Exception: boom!\n",
    ));
    assert!(out.contains(" ⏩ SKIP  Calc.Tests.Rounds\n          reason\n"));

    assert!(out.contains("REPLAY 1 FAILED TEST "));
    assert!(out.contains(" ⚡\u{fe0f}[FAIL] Calc.Tests.Divides\n"));
    assert!(out.contains("   StackTrace:\n"));
    assert!(out.contains("     at Calc.Tests.Helper()\n"));
    if cfg!(unix) {
        assert!(out.contains("          Line: 40, File: Tests/Calc.cs\n"));
        assert!(out.contains(
            "     at Calc.Tests.Divides() line 42 Tests/Calc.cs\n",
        ));
    }

    assert!(out.contains("SUMMARY: Calc.Tests"));
    assert!(out.contains("     🧪 TOTAL: 3   \n"));
    assert!(out.contains("     ✅  PASS: 1   \n"));
    assert!(out.contains("     ⚡\u{fe0f}  FAIL: 1   \n"));
    assert!(out.contains("     ⏩  SKIP: 1   \n"));
    assert!(out.contains("     ⏳  TIME: 1.23 s   \n"));
    assert!(!out.contains("SLOW:"));
    assert!(out.ends_with("\n\n\n"));
}

#[test]
fn end_to_end_colored() {
    let w = writer(Coloring::Always);

    run_scenario(&w);
    let out = w.into_inner().0;
    let plain = console::strip_ansi_codes(&out);

    assert!(out.contains("\u{1b}["));
    assert!(plain.contains("System.Exception: boom!"));
    assert!(plain.contains("     🧪 TOTAL: 3   \n"));
}

#[test]
fn filtered_empty_run() {
    let w = writer(Coloring::Never);

    w.on_run_start(RunStarted {
        filter: Some("Category=Nightly".into()),
        ..started()
    })
    .unwrap();
    w.on_run_complete(finished(0)).unwrap();

    assert_eq!(
        w.into_inner().0,
        format!(
            "{START}\
             \x20    ⏩ Calc.Tests:  FILTERED: Category=Nightly   \n\
             \x20    ⏩ Calc.Tests:  ⏳1.23 s   \n",
        ),
    );
}

#[test]
fn mismatched_total_is_reported_as_is() {
    let w = writer(Coloring::Never);

    w.on_run_start(started()).unwrap();
    for name in ["A", "B"] {
        w.on_result(TestRecord::new(name, OutcomeKind::Passed)).unwrap();
    }
    w.on_run_complete(finished(5)).unwrap();
    let out = w.into_inner().0;

    assert!(out.contains("     🧪 TOTAL: 5   \n"));
    assert!(out.contains("     ✅  PASS: 2   \n"));
}

#[test]
fn host_counts_are_preferred() {
    let w = writer(Coloring::Never);

    w.on_run_start(started()).unwrap();
    w.on_result(TestRecord::new("A", OutcomeKind::Passed)).unwrap();
    w.on_run_complete(RunFinished {
        counts: HashMap::from([
            (OutcomeKind::Passed, 10),
            (OutcomeKind::NotFound, 2),
        ]),
        ..finished(12)
    })
    .unwrap();
    let out = w.into_inner().0;

    assert!(out.contains("     ✅  PASS: 10   \n"));
    assert!(out.contains("     🔍  MISS: 2    \n"));
}

#[test]
fn skip_messages_suppressed_by_settings() {
    let w = writer(Coloring::Never);

    w.on_run_start(RunStarted {
        settings: HashMap::from([(
            DISABLE_FULL_SKIP_MESSAGES.to_owned(),
            " Calc.Integration ; ;".to_owned(),
        )]),
        ..started()
    })
    .unwrap();
    for name in ["Calc.Integration.Db", "Calc.Unit.Db"] {
        w.on_result(
            TestRecord::new(name, OutcomeKind::Skipped)
                .with_messages(["no database"]),
        )
        .unwrap();
    }
    let out = w.into_inner().0;

    assert_eq!(
        out.strip_prefix(START).unwrap(),
        " ⏩ SKIP  Calc.Integration.Db\n\
         \x20⏩ SKIP  Calc.Unit.Db\n\
         \x20         no database\n",
    );
}

#[test]
fn slow_tests_are_counted() {
    let w = writer(Coloring::Never);

    w.on_run_start(started()).unwrap();
    w.on_result(
        TestRecord::new("Calc.Tests.Sleeps", OutcomeKind::Passed)
            .with_duration(Duration::from_millis(2_500)),
    )
    .unwrap();
    w.on_run_complete(finished(1)).unwrap();
    let out = w.into_inner().0;

    assert!(out.contains(" ✅ PASS  Calc.Tests.Sleeps [2.5 s]\n"));
    assert!(out.contains("     🐢  SLOW: 1   \n"));
}

#[test]
fn concurrent_results_never_interleave() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 100;

    let w = writer(Coloring::Never);
    w.on_run_start(started()).unwrap();

    thread::scope(|s| {
        for t in 0..THREADS {
            let w = &w;
            _ = s.spawn(move || {
                for n in 0..PER_THREAD {
                    let record = match n % 4 {
                        0 => TestRecord::new(
                            format!("T{t}.Fails{n}"),
                            OutcomeKind::Failed,
                        )
                        .with_error_message("boom"),
                        1 => TestRecord::new(
                            format!("T{t}.Skips{n}"),
                            OutcomeKind::Skipped,
                        )
                        .with_messages(["skipped"]),
                        _ => TestRecord::new(
                            format!("T{t}.Passes{n}"),
                            OutcomeKind::Passed,
                        ),
                    };
                    w.on_result(record).unwrap();
                }
            });
        }
    });

    assert_eq!(w.stats().observed_total(), 800);
    assert_eq!(w.renderer().seen_failure_count(), 200);
    w.on_run_complete(finished(800)).unwrap();
    let out = w.into_inner().0;

    let lines = out.lines().collect::<Vec<_>>();
    let mut live_failures = 0;
    for (i, line) in lines.iter().enumerate() {
        if line.contains(" FAIL  T") {
            live_failures += 1;
            assert_eq!(lines[i + 1], "          boom", "after `{line}`");
        }
        if line.contains(" SKIP  T") {
            assert_eq!(lines[i + 1], "          skipped", "after `{line}`");
        }
    }
    assert_eq!(live_failures, 200);
    assert!(out.contains("REPLAY 20 of 200 FAILED TESTS"));
    assert!(out.contains("     🧪 TOTAL: 800   \n"));
    assert!(out.contains("     ✅  PASS: 400   \n"));
    assert!(out.contains("     ⚡\u{fe0f}  FAIL: 200   \n"));
    assert!(out.contains("     ⏩  SKIP: 200   \n"));
}
