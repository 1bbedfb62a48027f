use std::{env, fs::read_to_string, path::PathBuf, process, time::Instant};

use kestrel::{errors::errors::Error, lexer::lexer::Lexer, parser::parser::parse, render_error};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("usage: {} <file>", args.first().map(String::as_str).unwrap_or("kestrel"));
        process::exit(2);
    }

    let file_path = PathBuf::from(&args[1]);
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args[1].clone());

    let source = match read_to_string(&file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path.display(), error);
            process::exit(1);
        }
    };

    let start = Instant::now();

    let mut lexer = Lexer::new(source.clone(), Some(file_name));
    let tokens = match lexer.by_ref().collect::<Result<Vec<_>, _>>() {
        Ok(tokens) => tokens,
        Err(error) => fail(error, &source),
    };
    let names = lexer.interner().len();

    let (_, ast) = parse(tokens);
    let ast = match ast {
        Ok(ast) => ast,
        Err(error) => fail(error, &source),
    };

    for stmt in ast.iter() {
        println!("{}", stmt);
    }

    eprintln!("Parsed in {:?} ({} distinct names)", start.elapsed(), names);
}

fn fail(error: Error, source: &str) -> ! {
    eprint!("{}", render_error(&error, source));
    process::exit(1);
}
