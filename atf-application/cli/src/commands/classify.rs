//! Classify 命令处理

use colored::Colorize;

use atf_engine::executor::{classify, command_line};

pub fn handle(paths: &[String]) {
    for path in paths {
        let kind = classify(path);
        match command_line(path, &[]) {
            Ok((program, argv)) => {
                let mut line = vec![program];
                line.extend(argv);
                println!(
                    "{} {:?} {}",
                    path.cyan(),
                    kind,
                    line.join(" ").bright_black()
                );
            }
            Err(e) => println!("{} {:?} {}", path.cyan(), kind, e.to_string().red()),
        }
    }
}
