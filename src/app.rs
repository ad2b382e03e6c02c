use crate::book::{notation, Book, EntryId, Lang};
use crate::cli::{Cli, Commands, OutputFormat, QueryCommands};
use crate::graph::DependencyGraph;
use crate::query::{
    run_batch, AncestryQuery, ConnectionQuery, DescendancyQuery, Query, QueryRequest, QueryResult,
};
use clap::CommandFactory;
use clap_complete::generate;
use std::io;
use std::path::Path;

const DEFAULT_BOOK: &str = "ethica.json";

fn load_config(config: Option<&str>) -> Option<crate::utils::config::Config> {
    match config {
        Some(path) => crate::utils::config::load_config_at(Path::new(path)),
        None => crate::utils::config::load_config_near(Path::new(".")),
    }
}

// CLI flag wins unless it is the untouched default and the config file says otherwise.
fn effective_book(config: Option<&str>, book: &str) -> String {
    if book == DEFAULT_BOOK {
        if let Some(cfg) = load_config(config) {
            if let Some(path) = cfg.book.and_then(|b| b.path) {
                return path;
            }
        }
    }
    book.to_string()
}

fn effective_format(config: Option<&str>, format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Text {
        if let Some(cfg) = load_config(config) {
            return match cfg.query.and_then(|q| q.default_format).as_deref() {
                Some("json") => OutputFormat::Json,
                _ => format,
            };
        }
    }
    format
}

fn effective_lang(config: Option<&str>, lang: Lang) -> Lang {
    if lang == Lang::default() {
        if let Some(cfg) = load_config(config) {
            return match cfg.query.and_then(|q| q.default_lang).as_deref() {
                Some("la") => Lang::La,
                Some("en") => Lang::En,
                _ => lang,
            };
        }
    }
    lang
}

fn load_graph(book: &str) -> Result<DependencyGraph, i32> {
    match Book::load_json(Path::new(book)).and_then(|b| DependencyGraph::from_book(&b)) {
        Ok(g) => Ok(g),
        Err(e) => {
            eprintln!("Failed to load book {book}: {e}");
            Err(1)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{s}");
            0
        }
        Err(e) => {
            eprintln!("JSON encode error: {e}");
            1
        }
    }
}

fn print_result(res: &QueryResult, format: OutputFormat, quiet: bool) -> i32 {
    if matches!(format, OutputFormat::Json) {
        return print_json(res);
    }
    let rows: Vec<Vec<String>> = res
        .nodes
        .iter()
        .enumerate()
        .map(|(i, id)| vec![format!("{}", i + 1), id.0.clone(), notation::label(id.as_str())])
        .collect();
    let table = crate::utils::table::render(&["#", "Id", "Label"], &rows);
    println!("{table}");
    if !quiet {
        if res.edges.is_empty() {
            println!("<no edges>");
        } else {
            for e in &res.edges {
                println!("{} -> {}", e.from, e.to);
            }
        }
    }
    0
}

/// Run the CLI logic in-process. Returns an exit code (0 = success).
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn run_cli(cli: Cli) -> i32 {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = crate::cli::Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            let mut out = io::stdout();
            generate(shell, &mut cmd, bin_name, &mut out);
            0
        }
        Commands::Toc { book, config, lang, format, offset, limit } => {
            let book = effective_book(config.as_deref(), &book);
            let graph = match load_graph(&book) {
                Ok(g) => g,
                Err(code) => return code,
            };
            let fmt = effective_format(config.as_deref(), format);
            let lang = effective_lang(config.as_deref(), lang);
            let index = graph.index();

            let start = offset.min(index.count());
            let end = match limit {
                Some(l) => (start + l).min(index.count()),
                None => index.count(),
            };
            let page: Vec<_> = index.entries().skip(start).take(end - start).collect();

            if matches!(fmt, OutputFormat::Json) {
                #[derive(serde::Serialize)]
                struct Row {
                    position: usize,
                    id: String,
                    label: String,
                }
                let out: Vec<Row> = page
                    .iter()
                    .map(|e| Row {
                        position: e.position,
                        id: e.id.0.clone(),
                        label: notation::label(e.id.as_str()),
                    })
                    .collect();
                return print_json(&out);
            }
            let rows: Vec<Vec<String>> = page
                .iter()
                .map(|e| {
                    let mut row = vec![
                        e.position.to_string(),
                        e.id.0.clone(),
                        notation::label(e.id.as_str()),
                    ];
                    if cli.verbose > 0 {
                        let text = index.text_of(&e.id, lang).unwrap_or_default();
                        row.push(text.chars().take(48).collect());
                    }
                    row
                })
                .collect();
            let headers: &[&str] = if cli.verbose == 0 {
                &["Pos", "Id", "Label"]
            } else {
                &["Pos", "Id", "Label", "Text"]
            };
            let table = crate::utils::table::render(headers, &rows);
            println!("{table}");
            0
        }
        Commands::Show { id, book, config, lang, format } => {
            let book = effective_book(config.as_deref(), &book);
            let graph = match load_graph(&book) {
                Ok(g) => g,
                Err(code) => return code,
            };
            let fmt = effective_format(config.as_deref(), format);
            let lang = effective_lang(config.as_deref(), lang);
            let id = EntryId::new(&id);
            let index = graph.index();

            let position = match index.position_of(&id) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{e}");
                    return 1;
                }
            };
            let text = match index.text_of(&id, lang) {
                Ok(t) => t.to_string(),
                Err(e) => {
                    eprintln!("{e}");
                    return 1;
                }
            };
            let parents = match graph.parents_of(&id) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("{e}");
                    return 1;
                }
            };
            let previous = position.checked_sub(1).and_then(|p| index.id_at(p).ok()).cloned();
            let next = index.id_at(position + 1).ok().cloned();

            if matches!(fmt, OutputFormat::Json) {
                #[derive(serde::Serialize)]
                struct ShowResult {
                    id: String,
                    label: String,
                    position: usize,
                    text: String,
                    parents: Vec<String>,
                    previous: Option<String>,
                    next: Option<String>,
                }
                let out = ShowResult {
                    id: id.0.clone(),
                    label: notation::label(id.as_str()),
                    position,
                    text,
                    parents: parents.iter().map(|p| p.0.clone()).collect(),
                    previous: previous.map(|p| p.0),
                    next: next.map(|n| n.0),
                };
                return print_json(&out);
            }

            println!("{} = {}", id, notation::label(id.as_str()));
            println!("\n{text}\n");
            if parents.is_empty() {
                println!("Depends on: <none>");
            } else {
                let list: Vec<String> = parents.iter().map(|p| p.0.clone()).collect();
                println!("Depends on: {}", list.join(", "));
            }
            if !cli.quiet {
                let prev_s = previous.map_or("<none>".to_string(), |p| p.0);
                let next_s = next.map_or("<none>".to_string(), |n| n.0);
                println!("Previous: {prev_s}  Next: {next_s}");
            }
            0
        }
        Commands::Query { query } => match query {
            QueryCommands::Ancestry { node, book, config, format } => {
                let book = effective_book(config.as_deref(), &book);
                let graph = match load_graph(&book) {
                    Ok(g) => g,
                    Err(code) => return code,
                };
                let fmt = effective_format(config.as_deref(), format);
                match AncestryQuery::new(EntryId::new(&node)).run(&graph) {
                    Ok(res) => print_result(&res, fmt, cli.quiet),
                    Err(e) => {
                        eprintln!("{e}");
                        1
                    }
                }
            }
            QueryCommands::Descendancy { node, book, config, format } => {
                let book = effective_book(config.as_deref(), &book);
                let graph = match load_graph(&book) {
                    Ok(g) => g,
                    Err(code) => return code,
                };
                let fmt = effective_format(config.as_deref(), format);
                match DescendancyQuery::new(EntryId::new(&node)).run(&graph) {
                    Ok(res) => print_result(&res, fmt, cli.quiet),
                    Err(e) => {
                        eprintln!("{e}");
                        1
                    }
                }
            }
            QueryCommands::Connection { from, to, book, config, format } => {
                let book = effective_book(config.as_deref(), &book);
                let graph = match load_graph(&book) {
                    Ok(g) => g,
                    Err(code) => return code,
                };
                let fmt = effective_format(config.as_deref(), format);
                match ConnectionQuery::new(EntryId::new(&from), EntryId::new(&to)).run(&graph) {
                    Ok(res) => {
                        let code = print_result(&res, fmt, cli.quiet);
                        if matches!(fmt, OutputFormat::Text)
                            && res.edges.is_empty()
                            && res.nodes.len() == 2
                        {
                            println!("<no connection>");
                        }
                        code
                    }
                    Err(e) => {
                        eprintln!("{e}");
                        1
                    }
                }
            }
            QueryCommands::Parents { node, book, config, format } => {
                let book = effective_book(config.as_deref(), &book);
                let graph = match load_graph(&book) {
                    Ok(g) => g,
                    Err(code) => return code,
                };
                let fmt = effective_format(config.as_deref(), format);
                match graph.parents_of(&EntryId::new(&node)) {
                    Ok(parents) => {
                        if matches!(fmt, OutputFormat::Json) {
                            let out: Vec<String> = parents.iter().map(|p| p.0.clone()).collect();
                            return print_json(&out);
                        }
                        if parents.is_empty() {
                            println!("<no parents>");
                            return 0;
                        }
                        let rows: Vec<Vec<String>> = parents
                            .iter()
                            .enumerate()
                            .map(|(i, p)| {
                                vec![
                                    format!("{}", i + 1),
                                    p.0.clone(),
                                    notation::label(p.as_str()),
                                ]
                            })
                            .collect();
                        let table = crate::utils::table::render(&["#", "Id", "Label"], &rows);
                        println!("{table}");
                        0
                    }
                    Err(e) => {
                        eprintln!("{e}");
                        1
                    }
                }
            }
            QueryCommands::Report { node, book, config, format } => {
                let book = effective_book(config.as_deref(), &book);
                let graph = match load_graph(&book) {
                    Ok(g) => g,
                    Err(code) => return code,
                };
                let fmt = effective_format(config.as_deref(), format);
                let id = EntryId::new(&node);
                let requests = vec![
                    QueryRequest::Ancestry(id.clone()),
                    QueryRequest::Descendancy(id.clone()),
                ];
                let mut results = run_batch(&graph, &requests).into_iter();
                let (ancestry, descendancy) = match (results.next(), results.next()) {
                    (Some(Ok(a)), Some(Ok(d))) => (a, d),
                    (Some(Err(e)), _) | (_, Some(Err(e))) => {
                        eprintln!("{e}");
                        return 1;
                    }
                    _ => return 1,
                };
                if matches!(fmt, OutputFormat::Json) {
                    #[derive(serde::Serialize)]
                    struct Report {
                        ancestry: QueryResult,
                        descendancy: QueryResult,
                    }
                    return print_json(&Report { ancestry, descendancy });
                }
                println!("Ancestry of {id}:");
                let code = print_result(&ancestry, fmt, cli.quiet);
                if code != 0 {
                    return code;
                }
                println!("\nDescendancy of {id}:");
                print_result(&descendancy, fmt, cli.quiet)
            }
        },
    }
}
