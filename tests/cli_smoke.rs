use std::path::PathBuf;

use roadsketch::SceneConfig;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_roadsketch")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "roadsketch.exe"
            } else {
                "roadsketch"
            });
            p
        })
}

fn smoke_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn cli_frame_writes_png_and_svg() {
    let dir = smoke_dir("frame");
    let png = dir.join("road.png");
    let svg = dir.join("road.svg");
    let _ = std::fs::remove_file(&png);
    let _ = std::fs::remove_file(&svg);

    let mut cfg = SceneConfig::default();
    cfg.sign.draw = true;
    let cfg_path = dir.join("scene.json");
    let f = std::fs::File::create(&cfg_path).unwrap();
    serde_json::to_writer_pretty(f, &cfg).unwrap();
    let cfg_arg = cfg_path.to_string_lossy().to_string();

    for out in [&png, &svg] {
        let out_arg = out.to_string_lossy().to_string();
        let status = std::process::Command::new(exe())
            .args(["frame", "--width", "800", "--time-ms", "500", "--background", "#ffffff"])
            .args(["--config", cfg_arg.as_str(), "--out", out_arg.as_str()])
            .status()
            .unwrap();
        assert!(status.success());
        assert!(out.exists());
    }

    let img = image::open(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (800, 400));
    let doc = std::fs::read_to_string(&svg).unwrap();
    assert!(doc.starts_with("<svg"));
}

#[test]
fn cli_sequence_numbers_frames() {
    let dir = smoke_dir("sequence");
    for i in 0..3 {
        let _ = std::fs::remove_file(dir.join(format!("frame_{i:05}.png")));
    }
    let dir_arg = dir.to_string_lossy().to_string();

    let status = std::process::Command::new(exe())
        .args(["sequence", "--width", "360", "--frames", "3", "--fps", "30"])
        .args(["--out-dir", dir_arg.as_str()])
        .status()
        .unwrap();
    assert!(status.success());

    for i in 0..3 {
        let img = image::open(dir.join(format!("frame_{i:05}.png")))
            .unwrap()
            .to_rgba8();
        // Narrow displays use the mobile height.
        assert_eq!(img.dimensions(), (360, 250));
    }
}

#[test]
fn cli_dump_prints_frame_json() {
    let out = std::process::Command::new(exe())
        .args(["dump", "--width", "640", "--time-ms", "250", "--theme", "dark"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["viewport"]["width"], 640.0);
    assert_eq!(v["seed"], 2);
    let kinds: Vec<&str> = v["primitives"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["kind"].as_str())
        .collect();
    assert_eq!(kinds.first(), Some(&"gradient"));
    assert!(kinds.contains(&"line"));
}

#[test]
fn cli_rejects_zero_width() {
    let status = std::process::Command::new(exe())
        .args(["dump", "--width", "0", "--time-ms", "0"])
        .status()
        .unwrap();
    assert!(!status.success());
}
