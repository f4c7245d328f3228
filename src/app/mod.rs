mod format;
mod tui;


use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::{Cli, Command};
use crate::db::Database;
use crate::logging;
use crate::paths::{database_file_path, log_file_path};
use crate::progress::{
    ProgressController, ProgressMap, ProgressStore, StorageBackend, encode, try_decode,
};

use self::format::{
    format_chapter_dots, format_chapter_list, format_last_read_display, format_read_summary,
    truncate,
};

pub fn run(cli: Cli) -> Result<()> {
    let db_path = database_file_path(cli.db.as_deref())?;
    match cli.command {
        Some(Command::Tui { .. }) => logging::init_file(cli.verbose, &log_file_path(&db_path))?,
        _ => logging::init_stderr(cli.verbose),
    }

    let store = ProgressStore::new(open_db(&db_path)?);

    match cli.command {
        Some(Command::Show { book, chapters }) => run_show(&store, &book, chapters),
        Some(Command::Toggle {
            book,
            chapter,
            chapters,
        }) => run_toggle(&store, &book, chapter, chapters)?,
        Some(Command::MarkAll { book, chapters }) => run_mark_all(&store, &book, chapters),
        Some(Command::Reset { book }) => run_reset(&store, &book),
        Some(Command::Export) => run_export(&store)?,
        Some(Command::Import { file }) => run_import(&store, &file)?,
        Some(Command::Tui { book, chapters }) => tui::run_tui(&store, &book, chapters)?,
        Some(Command::List) | None => run_list(&store),
    }

    Ok(())
}

fn run_show<B: StorageBackend>(store: &ProgressStore<B>, book: &str, chapters: u32) {
    let controller = ProgressController::new(store, book);
    print!("{}", progress_report(&controller, chapters));
}

fn run_toggle<B: StorageBackend>(
    store: &ProgressStore<B>,
    book: &str,
    chapter: u32,
    chapters: Option<u32>,
) -> Result<()> {
    let index = chapter_index(chapter, chapters)?;
    let mut controller = ProgressController::new(store, book);
    let completed = controller.toggle_chapter(index);
    let state = if completed { "read" } else { "unread" };
    println!("Marked chapter {chapter} of {book} as {state}.");
    println!("{}", progress_line(&controller, chapters));
    Ok(())
}

fn run_mark_all<B: StorageBackend>(store: &ProgressStore<B>, book: &str, chapters: u32) {
    let mut controller = ProgressController::new(store, book);
    controller.mark_all_complete(chapters);
    println!("Marked all {chapters} chapters of {book} as read.");
    println!("{}", progress_line(&controller, Some(chapters)));
}

fn run_reset<B: StorageBackend>(store: &ProgressStore<B>, book: &str) {
    let mut controller = ProgressController::new(store, book);
    controller.reset_progress();
    println!("Reset reading progress for {book}.");
}

fn run_list<B: StorageBackend>(store: &ProgressStore<B>) {
    let map = store.load();
    if map.is_empty() {
        println!("No tracked books yet. Run `readtrack toggle <BOOK> <CHAPTER>` first.");
        return;
    }
    print!("{}", library_table(&map));
}

fn run_export<B: StorageBackend>(store: &ProgressStore<B>) -> Result<()> {
    let map = store
        .try_load()
        .context("stored reading progress cannot be exported")?;
    println!("{}", encode(&map)?);
    Ok(())
}

fn run_import<B: StorageBackend>(store: &ProgressStore<B>, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let imported =
        try_decode(&raw).with_context(|| format!("failed to decode {}", path.display()))?;
    let total = imported.len();

    let mut map = store
        .try_load()
        .context("stored reading progress is unreadable; refusing to merge into it")?;
    let updated = merge_imported(&mut map, imported);
    store.try_save(&map)?;

    info!(path = %path.display(), total, updated, "imported reading progress");
    println!(
        "Imported {total} book(s) from {}: {updated} updated, {} kept.",
        path.display(),
        total - updated
    );
    Ok(())
}

fn open_db(path: &Path) -> Result<Database> {
    let db = Database::open(path)?;
    db.migrate()?;
    Ok(db)
}

/// Converts a 1-based chapter number from the command line to an index.
pub(crate) fn chapter_index(chapter: u32, total_chapters: Option<u32>) -> Result<u32> {
    if chapter == 0 {
        bail!("chapter numbers start at 1");
    }
    if let Some(total) = total_chapters
        && chapter > total
    {
        bail!("chapter {chapter} is out of range: the book has {total} chapters");
    }
    Ok(chapter - 1)
}

/// Takes every imported record that is newer than the stored one. Returns how
/// many records were taken.
pub(crate) fn merge_imported(map: &mut ProgressMap, imported: ProgressMap) -> usize {
    let mut updated = 0;
    for (book, record) in imported {
        let keep_existing = map
            .get(&book)
            .is_some_and(|existing| existing.last_read >= record.last_read);
        if !keep_existing {
            map.insert(book, record);
            updated += 1;
        }
    }
    updated
}

pub(crate) fn progress_line<B: StorageBackend>(
    controller: &ProgressController<'_, B>,
    total_chapters: Option<u32>,
) -> String {
    let completed = controller.completed_chapters().len();
    match total_chapters {
        Some(total) => format!(
            "{} ({}%)",
            format_read_summary(completed, total),
            controller.progress_percentage(total)
        ),
        None => format!("{completed} chapter(s) read"),
    }
}

pub(crate) fn progress_report<B: StorageBackend>(
    controller: &ProgressController<'_, B>,
    total_chapters: u32,
) -> String {
    let mut out = format!("Reading progress: {}\n", controller.book_id());
    out.push_str(&format!(
        "  {}\n",
        format_chapter_dots(controller.completed_chapters(), total_chapters)
    ));
    out.push_str(&format!(
        "  {}\n",
        progress_line(controller, Some(total_chapters))
    ));
    if let Some(last_read) = controller.last_read() {
        out.push_str(&format!(
            "  Last read: {}\n",
            format_last_read_display(last_read)
        ));
    }
    if controller.progress_percentage(total_chapters) == 100 {
        out.push_str("  Congratulations! You've completed this book!\n");
    }
    out
}

pub(crate) fn library_table(map: &ProgressMap) -> String {
    let mut out = format!(
        "{:<24} {:<6} {:<30} {:<24}\n",
        "BOOK", "READ", "CHAPTERS", "LAST READ"
    );
    for (book, record) in map {
        out.push_str(&format!(
            "{:<24} {:<6} {:<30} {:<24}\n",
            truncate(book, 24),
            record.completed_chapters.len(),
            truncate(&format_chapter_list(&record.completed_chapters), 30),
            format_last_read_display(&record.last_read)
        ));
    }
    out
}
