use std::fs;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_markup-rewrite"))
}

#[test]
fn rewrite_prints_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("tree.json");
    fs::write(
        &input,
        r#"{"kind":"method","name":"Render","children":[
            {"kind":"markup","tokens":["<p>Hi "]},
            {"kind":"foreign","label":"expr","payload":"Name"},
            {"kind":"markup","tokens":["</p>"]}
        ]}"#,
    )
    .expect("write input");

    let output = bin().arg("rewrite").arg(&input).output().expect("run binary");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "#method Render\n  <p>\n    \"Hi \"\n    {expr Name}\n"
    );
}

#[test]
fn rewrite_failure_exits_nonzero_with_cause() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("tree.json");
    fs::write(
        &input,
        r#"{"kind":"method","name":"Render","children":[{"kind":"markup","tokens":["<div><span></div>"]}]}"#,
    )
    .expect("write input");

    let output = bin().arg("rewrite").arg(&input).output().expect("run binary");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("end tag </div> does not close open element <span>"),
        "{stderr}"
    );
}

#[test]
fn shell_writes_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let template = dir.path().join("index.html");
    fs::write(&template, "<body><script type=\"blazor-boot\"></script></body>").expect("write");
    let refs = dir.path().join("refs.txt");
    fs::write(&refs, "A.dll\nB.dll\n").expect("write refs");
    let out = dir.path().join("site").join("index.html");

    let output = bin()
        .arg("shell")
        .arg(&template)
        .args(["--main", "App.dll", "--linker"])
        .arg("--references")
        .arg(&refs)
        .arg("--output")
        .arg(&out)
        .output()
        .expect("run binary");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fs::read_to_string(&out).expect("read page"),
        "<body><script src=\"_framework/blazor.js\" main=\"App.dll\" references=\"A.dll,B.dll\" \
         linker-enabled=\"true\"></script></body>"
    );
}
