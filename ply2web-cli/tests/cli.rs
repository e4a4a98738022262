use clap::Parser;
use ply2web_cli::{parse_window_size, run, Args, Mode, EXIT_USAGE};
use std::io::Write;
use std::path::PathBuf;

const CLOUD: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
property uchar red
property uchar green
property uchar blue
end_header
0 0 0 255 0 0
1 0 0 0 255 0
0 1 0 0 0 255
0 0 1 255 255 255
";

const PLAIN: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
end_header
0 0 0
1 0 0
0 1 0
";

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("ply2web").chain(args.iter().copied())).unwrap()
}

fn ply_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_defaults() {
    let args = parse(&[]);
    assert_eq!(args.ply_file, None);
    assert!(!args.spawn_host);
    assert_eq!(args.port, 38080);
    assert_eq!(args.bind, "0.0.0.0");
    assert!(!args.spawn_web);
    assert!(!args.serve());
    assert!(!args.animation);
    assert!(!args.upside_down);
    assert_eq!(args.output_filepath, None);
    assert_eq!(args.mode(), Mode::Usage);

    let config = args.render_config().unwrap();
    assert_eq!(config.window_size, [1024, 768]);
    assert_eq!(config.animation.frames, 36);
}

#[test]
fn test_all_flags() {
    let args = parse(&[
        "--ply-file",
        "scan.ply",
        "--port",
        "8080",
        "--bind",
        "127.0.0.1",
        "--spawn-web",
        "--animation",
        "--upside-down",
        "-o",
        "out.gif",
        "--frames",
        "12",
        "--window-size",
        "320x240",
    ]);
    assert_eq!(args.ply_file, Some(PathBuf::from("scan.ply")));
    assert_eq!(args.port, 8080);
    assert!(args.serve());
    assert!(args.upside_down);
    assert_eq!(args.output_path(), Some(PathBuf::from("out.gif")));
    assert_eq!(args.mode(), Mode::Serve);

    let serve = args.serve_config();
    assert_eq!(serve.bind, "127.0.0.1");
    assert!(serve.open_browser);

    let config = args.render_config().unwrap();
    assert_eq!(config.window_size, [320, 240]);
    assert_eq!(config.animation.frames, 12);
}

#[test]
fn test_web_serve_toggle() {
    assert!(parse(&["--web-serve"]).serve());
    assert!(!parse(&["--web-serve", "--no-web-serve"]).serve());
    assert!(parse(&["--no-web-serve", "--web-serve"]).serve());

    // Opening a browser never overrides an explicit opt-out
    let args = parse(&["--spawn-web", "--no-web-serve", "-o", "x.png"]);
    assert!(!args.serve());
    assert_eq!(args.mode(), Mode::Output);
}

#[test]
fn test_rejects_bad_input() {
    assert!(Args::try_parse_from(["ply2web", "--unknown"]).is_err());
    assert!(Args::try_parse_from(["ply2web", "--port", "99999"]).is_err());
    assert!(Args::try_parse_from(["ply2web", "--port", "web"]).is_err());
    assert!(Args::try_parse_from(["ply2web", "--window-size", "640"]).is_err());
}

#[test]
fn test_parse_window_size() {
    assert_eq!(parse_window_size("640x480"), Ok([640, 480]));
    assert_eq!(parse_window_size("640X480"), Ok([640, 480]));
    assert!(parse_window_size("0x480").is_err());
    assert!(parse_window_size("640x").is_err());
    assert!(parse_window_size("70000x70000").is_err());
    assert!(Args::try_parse_from(["ply2web", "--window-size", "70000x70000"]).is_err());
}

#[test]
fn test_mode_precedence() {
    assert_eq!(parse(&["--spawn-host", "--web-serve"]).mode(), Mode::Desktop);
    assert_eq!(parse(&["-o", "shot.png"]).mode(), Mode::Output);
    assert_eq!(parse(&["--animation"]).mode(), Mode::Output);
}

#[test]
fn test_animation_default_path() {
    let args = parse(&["--ply-file", "data/scan.ply", "--animation"]);
    assert_eq!(args.output_path(), Some(PathBuf::from("scan.gif")));
    assert_eq!(parse(&["--animation"]).output_path(), Some(PathBuf::from("animation.gif")));
}

#[test]
fn test_no_mode_exits_with_usage_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = ply_file(&dir, "cloud.ply", CLOUD);
    let args = parse(&["--ply-file", path.to_str().unwrap()]);
    assert_eq!(run(args).unwrap(), EXIT_USAGE);
}

#[test]
fn test_screenshot_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = ply_file(&dir, "plain.ply", PLAIN);
    let output = dir.path().join("shot.png");
    let args = parse(&[
        "--ply-file",
        path.to_str().unwrap(),
        "--window-size",
        "64x48",
        "-o",
        output.to_str().unwrap(),
    ]);
    assert_eq!(run(args).unwrap(), 0);

    assert_eq!(image::image_dimensions(&output).unwrap(), (64, 48));
}

#[test]
fn test_animation_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = ply_file(&dir, "cloud.ply", CLOUD);
    let output = dir.path().join("orbit.gif");
    let args = parse(&[
        "--ply-file",
        path.to_str().unwrap(),
        "--animation",
        "--frames",
        "4",
        "--window-size",
        "32x32",
        "--upside-down",
        "-o",
        output.to_str().unwrap(),
    ]);
    assert_eq!(run(args).unwrap(), 0);
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let args = parse(&["--ply-file", dir.path().join("missing.ply").to_str().unwrap()]);
    assert!(run(args).is_err());
}

#[test]
fn test_config_file_overridden_by_flags() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("render.toml");
    std::fs::write(&config, "point_size = 2.0\nwindow_size = [200, 100]\n").unwrap();

    let args = parse(&["--config", config.to_str().unwrap(), "--window-size", "50x40"]);
    let render = args.render_config().unwrap();
    assert_eq!(render.point_size, 2.0);
    assert_eq!(render.window_size, [50, 40]);
}
