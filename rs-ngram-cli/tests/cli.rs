use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CORPUS: &str = "\
public int getCount() { return count; }
public void setCount(int count) { this.count = count; }
public boolean isEmpty() { return size == 0; }
public int size() { return size; }
public void clear() { size = 0; count = 0; }
public String getName() { return name; }
public void setName(String name) { this.name = name; }
public boolean hasNext() { return index < size; }
public int next() { return items[index++]; }
public void reset() { index = 0; }
public int first() { return items[0]; }
public void add(int item) { items[size++] = item; }
public int sum() { int total = 0; for (int i = 0; i < size; i++) { total += items[i]; } return total; }
public int max() { int best = items[0]; for (int i = 1; i < size; i++) { if (items[i] > best) { best = items[i]; } } return best; }
public int min() { int best = items[0]; for (int i = 1; i < size; i++) { if (items[i] < best) { best = items[i]; } } return best; }
";

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().expect("create tempdir");
    fs::write(dir.path().join("methods.txt"), CORPUS).expect("write corpus");
    dir
}

fn rs_ngram(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rs-ngram").expect("binary exists");
    cmd.current_dir(dir);
    cmd
}

#[test]
fn train_writes_model_and_report() {
    let dir = workspace();
    let output = rs_ngram(dir.path())
        .args(["--quiet", "train", "methods.txt", "--min-n", "2", "--max-n", "4", "--report", "report.json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).expect("utf8 stdout");
    assert_eq!(stdout.lines().filter(|line| line.contains("test perplexity")).count(), 3);
    assert!(stdout.lines().any(|line| line.starts_with("best\t")));
    assert!(dir.path().join("methods.bin").exists());

    let report: Value =
        serde_json::from_slice(&fs::read(dir.path().join("report.json")).expect("read report")).expect("valid JSON");
    assert!(report.is_object());
}

#[test]
fn second_train_reuses_the_model() {
    let dir = workspace();
    rs_ngram(dir.path()).args(["-q", "train", "methods.txt", "--max-n", "3"]).assert().success();

    let output = rs_ngram(dir.path())
        .args(["-q", "train", "methods.txt", "--max-n", "3"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).expect("utf8 stdout");
    assert!(!stdout.contains("test perplexity"));
    assert!(stdout.contains("validation perplexity"));
}

#[test]
fn complete_and_evaluate_use_a_trained_model() {
    let dir = workspace();
    rs_ngram(dir.path())
        .args(["-q", "train", "methods.txt", "--min-n", "2", "--max-n", "2", "-m", "bigram.bin"])
        .assert()
        .success();

    let output = rs_ngram(dir.path())
        .args(["-q", "complete", "-m", "bigram.bin", "--max-length", "5", "public", "int"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).expect("utf8 stdout");
    assert!(stdout.lines().count() <= 5);
    for line in stdout.lines() {
        let (_, probability) = line.split_once('\t').expect("token and probability");
        let probability: f64 = probability.parse().expect("numeric probability");
        assert!(probability > 0.0 && probability <= 1.0);
    }

    let output = rs_ngram(dir.path())
        .args(["-q", "evaluate", "-m", "bigram.bin", "methods.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let score: f64 = String::from_utf8(output).expect("utf8 stdout").trim().parse().expect("perplexity");
    assert!(score >= 1.0);
}

#[test]
fn filters_only_apply_to_training() {
    let dir = workspace();
    let getters: String = (0..10)
        .map(|i| format!("public int getField{i}() {{ return field{i}; }}\n"))
        .collect();
    fs::write(dir.path().join("getters.txt"), getters).expect("write corpus");

    rs_ngram(dir.path()).args(["-q", "train", "getters.txt"]).assert().failure();
    rs_ngram(dir.path())
        .args(["-q", "train", "getters.txt", "--raw", "--max-n", "2"])
        .assert()
        .success();
    rs_ngram(dir.path())
        .args(["-q", "evaluate", "-m", "getters.bin", "getters.txt"])
        .assert()
        .success();
}

#[test]
fn invalid_range_fails() {
    let dir = workspace();
    rs_ngram(dir.path())
        .args(["-q", "train", "methods.txt", "--min-n", "5", "--max-n", "3"])
        .assert()
        .failure();
}

#[test]
fn missing_model_fails() {
    let dir = workspace();
    rs_ngram(dir.path())
        .args(["-q", "complete", "-m", "nope.bin", "int"])
        .assert()
        .failure();
}
