use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_meetingd");
    let mut child = Command::new(exe)
        .env_remove("MEETINGD_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn meetingd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

#[test]
fn roster_load_replaces_students_and_clears_schedule() {
    let workspace = temp_dir("meetingd-roster-load");
    let path = workspace.join("roster.json");
    std::fs::write(
        &path,
        json!([
            { "id": 41, "student_name": "Dana", "age": 30, "class_name": "History",
              "instructor_name": "Mr. Osei", "meetings": 2 },
            { "id": 42, "student_name": "Eli", "age": 31, "class_name": "History",
              "instructor_name": "Mr. Osei", "meetings": 4 }
        ])
        .to_string(),
    )
    .expect("write roster");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "dates.toggle",
        json!({ "date": "2024-09-02" }),
    );
    let generated = request(&mut stdin, &mut reader, "2", "schedule.generate", json!({}));
    assert_eq!(generated["result"]["meetingCount"], json!(20));

    let loaded = request(
        &mut stdin,
        &mut reader,
        "3",
        "roster.load",
        json!({ "path": path.to_string_lossy() }),
    );
    assert_eq!(loaded["ok"], json!(true));
    assert_eq!(loaded["result"]["studentCount"], json!(2));

    let snapshot = request(&mut stdin, &mut reader, "4", "schedule.get", json!({}));
    assert_eq!(snapshot["result"]["assignments"], json!([]));
    assert_eq!(snapshot["result"]["view"], json!("calendar"));
    assert_eq!(snapshot["result"]["selectedDates"], json!(["2024-09-02"]));

    let listed = request(&mut stdin, &mut reader, "5", "roster.list", json!({}));
    let students = listed["result"]["students"].as_array().expect("students");
    assert_eq!(students.len(), 2);
    assert_eq!(students[0]["name"], json!("Dana"));
    assert_eq!(students[0]["className"], json!("History"));
    assert_eq!(students[0]["requiredMeetings"], json!(2));

    let regenerated = request(&mut stdin, &mut reader, "6", "schedule.generate", json!({}));
    let first = &regenerated["result"]["assignments"][0]["meetings"][0];
    assert_eq!(first["student"]["id"], json!(42));
    assert_eq!(first["id"], json!("2024-09-02-42"));

    let settings = request(&mut stdin, &mut reader, "7", "setup.get", json!({}));
    assert_eq!(
        settings["result"]["settings"]["rosterPath"],
        json!(path.to_string_lossy())
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn roster_load_failures_keep_current_roster() {
    let workspace = temp_dir("meetingd-roster-bad");
    let dup = workspace.join("dup.json");
    std::fs::write(
        &dup,
        json!([
            { "id": 1, "name": "A", "age": 20, "className": "Math", "instructorName": "X" },
            { "id": 1, "name": "B", "age": 21, "className": "Math", "instructorName": "X" }
        ])
        .to_string(),
    )
    .expect("write roster");

    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    for (id, p) in [("1", dup.clone()), ("2", workspace.join("absent.json"))] {
        let v = request(
            &mut stdin,
            &mut reader,
            id,
            "roster.load",
            json!({ "path": p.to_string_lossy() }),
        );
        assert_eq!(v["ok"], json!(false));
        assert_eq!(v["error"]["code"], json!("roster_load_failed"));
    }
    let health = request(&mut stdin, &mut reader, "3", "health", json!({}));
    assert_eq!(health["result"]["rosterSize"], json!(20));

    let missing = request(&mut stdin, &mut reader, "4", "roster.load", json!({}));
    assert_eq!(missing["error"]["code"], json!("bad_params"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn setup_update_validates_patches() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let unknown = request(
        &mut stdin,
        &mut reader,
        "1",
        "setup.update",
        json!({ "patch": { "meetingsPerDay": 3 } }),
    );
    assert_eq!(unknown["error"]["code"], json!("bad_params"));

    let roster_path = request(
        &mut stdin,
        &mut reader,
        "2",
        "setup.update",
        json!({ "patch": { "rosterPath": "/tmp/x.json" } }),
    );
    assert_eq!(roster_path["error"]["code"], json!("bad_params"));

    let ok = request(
        &mut stdin,
        &mut reader,
        "3",
        "setup.update",
        json!({ "patch": { "calendarDays": 14, "linkBase": "https://rooms.test/" } }),
    );
    assert_eq!(ok["ok"], json!(true));
    assert_eq!(ok["result"]["settings"]["calendarDays"], json!(14));

    let cal = request(
        &mut stdin,
        &mut reader,
        "4",
        "calendar.days",
        json!({ "today": "2024-01-01" }),
    );
    assert_eq!(cal["result"]["days"].as_array().map(|d| d.len()), Some(14));

    let _ = request(
        &mut stdin,
        &mut reader,
        "5",
        "dates.toggle",
        json!({ "date": "2024-01-03" }),
    );
    let generated = request(&mut stdin, &mut reader, "6", "schedule.generate", json!({}));
    assert_eq!(
        generated["result"]["assignments"][0]["meetings"][0]["meetingLink"],
        json!("https://rooms.test/2024-01-03-7")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn ranking_change_drops_generated_schedule() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "dates.toggle",
        json!({ "date": "2024-01-01" }),
    );
    let generated = request(&mut stdin, &mut reader, "2", "schedule.generate", json!({}));
    assert_eq!(generated["result"]["meetingCount"], json!(20));

    let unrelated = request(
        &mut stdin,
        &mut reader,
        "3",
        "setup.update",
        json!({ "patch": { "calendarDays": 7 } }),
    );
    assert_eq!(unrelated["result"]["scheduleCleared"], json!(false));
    let kept = request(&mut stdin, &mut reader, "4", "schedule.get", json!({}));
    assert_eq!(kept["result"]["view"], json!("overview"));

    let reranked = request(
        &mut stdin,
        &mut reader,
        "5",
        "setup.update",
        json!({ "patch": { "priority": "age" } }),
    );
    assert_eq!(reranked["ok"], json!(true));
    assert_eq!(reranked["result"]["scheduleCleared"], json!(true));

    let snapshot = request(&mut stdin, &mut reader, "6", "schedule.get", json!({}));
    assert_eq!(snapshot["result"]["assignments"], json!([]));
    assert_eq!(snapshot["result"]["view"], json!("calendar"));
    assert_eq!(snapshot["result"]["selectedDates"], json!(["2024-01-01"]));

    let stale = request(&mut stdin, &mut reader, "7", "export.document", json!({}));
    assert_eq!(stale["result"]["tables"].as_array().map(|t| t.len()), Some(1));

    let _ = request(&mut stdin, &mut reader, "8", "schedule.generate", json!({}));
    let doc = request(&mut stdin, &mut reader, "9", "export.document", json!({}));
    let day = &doc["result"]["tables"][1];
    assert_eq!(day["name"], json!("2024-01-01"));
    assert_eq!(day["header"][4], json!("Priority (Age)"));
    let ages: Vec<u64> = day["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .map(|r| r[4].as_u64().expect("age"))
        .collect();
    assert_eq!(ages.len(), 20);
    assert!(ages.windows(2).all(|w| w[0] >= w[1]), "ages {:?}", ages);

    let relinked = request(
        &mut stdin,
        &mut reader,
        "10",
        "setup.update",
        json!({ "patch": { "linkBase": "https://rooms.test/" } }),
    );
    assert_eq!(relinked["result"]["scheduleCleared"], json!(true));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn calendar_days_setting_is_bounded() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let huge = request(
        &mut stdin,
        &mut reader,
        "1",
        "setup.update",
        json!({ "patch": { "calendarDays": 1_000_000_000_000u64 } }),
    );
    assert_eq!(huge["ok"], json!(false));
    assert_eq!(huge["error"]["code"], json!("bad_params"));

    let settings = request(&mut stdin, &mut reader, "2", "setup.get", json!({}));
    assert_eq!(settings["result"]["settings"]["calendarDays"], json!(30));

    let cal = request(
        &mut stdin,
        &mut reader,
        "3",
        "calendar.days",
        json!({ "today": "2024-01-01" }),
    );
    assert_eq!(cal["result"]["days"].as_array().map(|d| d.len()), Some(30));

    let max = request(
        &mut stdin,
        &mut reader,
        "4",
        "setup.update",
        json!({ "patch": { "calendarDays": 366 } }),
    );
    assert_eq!(max["ok"], json!(true));
    let cal = request(
        &mut stdin,
        &mut reader,
        "5",
        "calendar.days",
        json!({ "today": "2024-01-01" }),
    );
    assert_eq!(cal["result"]["days"].as_array().map(|d| d.len()), Some(366));

    drop(stdin);
    let _ = child.wait();
}
