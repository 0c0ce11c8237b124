use std::path::PathBuf;

use cartolina::Postcard;

fn bin_path() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_cartolina")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "cartolina.exe"
            } else {
                "cartolina"
            });
            p
        })
}

#[test]
fn cli_render_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let card_path = dir.join("card.json");
    let out_path = dir.join("back.png");
    let _ = std::fs::remove_file(&out_path);

    let f = std::fs::File::create(&card_path).unwrap();
    serde_json::to_writer_pretty(f, &Postcard::sample()).unwrap();

    let card_arg = card_path.to_string_lossy().to_string();
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(bin_path())
        .args(["render", "--in", card_arg.as_str(), "--side", "back", "--out"])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    let png = std::fs::read(&out_path).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!(decoded.width(), 1500);
    assert_eq!(decoded.height(), 1000);
}

#[test]
fn cli_init_without_out_writes_postcard_json() {
    let dir = PathBuf::from("target").join("cli_smoke_init");
    std::fs::create_dir_all(&dir).unwrap();

    let out_path = dir.join("postcard.json");
    let _ = std::fs::remove_file(&out_path);

    // the command runs inside the scratch dir, so the relative fallback
    // path must be absolutized first
    let mut bin = bin_path();
    if bin.is_relative() {
        bin = std::env::current_dir().unwrap().join(bin);
    }

    let status = std::process::Command::new(bin)
        .current_dir(&dir)
        .arg("init")
        .status()
        .unwrap();

    assert!(status.success());
    let s = std::fs::read_to_string(&out_path).unwrap();
    let card: Postcard = serde_json::from_str(&s).unwrap();
    card.validate().unwrap();
}

#[test]
fn cli_init_writes_a_valid_card() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let out_path = dir.join("init.json");
    let _ = std::fs::remove_file(&out_path);

    let out_arg = out_path.to_string_lossy().to_string();
    let status = std::process::Command::new(bin_path())
        .args(["init", "--out"])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    let s = std::fs::read_to_string(&out_path).unwrap();
    let card: Postcard = serde_json::from_str(&s).unwrap();
    card.validate().unwrap();
    assert!(!card.postmark.date.is_empty());
}
