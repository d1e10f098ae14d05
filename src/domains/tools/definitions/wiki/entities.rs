//! BookStack content types and the fields each accepts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Tag, WikiEntity, validate_name};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::handlers::Validate;

fn validate_optional_name(name: &Option<String>) -> ToolResult<()> {
    match name {
        Some(name) => validate_name(name),
        None => Ok(()),
    }
}

// ============================================================================
// Books
// ============================================================================

pub struct Book;

impl WikiEntity for Book {
    const ENDPOINT: &'static str = "/api/books";
    const NOUN: &'static str = "book";
    const PLURAL: &'static str = "books";
    const CREATE_TOOL: &'static str = "create_book";
    const READ_TOOL: &'static str = "read_book";
    const UPDATE_TOOL: &'static str = "update_book";
    const DELETE_TOOL: &'static str = "delete_book";
    const LIST_TOOL: &'static str = "list_books";

    type Draft = BookDraft;
    type Patch = BookPatch;
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookDraft {
    #[schemars(description = "Book name (max 255 characters)")]
    pub name: String,

    #[schemars(description = "Plain text description")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[schemars(description = "Tags to attach")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Validate for BookDraft {
    fn validate(&self) -> ToolResult<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookPatch {
    #[schemars(description = "New book name")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[schemars(description = "New plain text description")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[schemars(description = "Replacement tag list")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Validate for BookPatch {
    fn validate(&self) -> ToolResult<()> {
        validate_optional_name(&self.name)
    }
}

// ============================================================================
// Bookshelves
// ============================================================================

pub struct Bookshelf;

impl WikiEntity for Bookshelf {
    const ENDPOINT: &'static str = "/api/shelves";
    const NOUN: &'static str = "bookshelf";
    const PLURAL: &'static str = "bookshelves";
    const CREATE_TOOL: &'static str = "create_bookshelf";
    const READ_TOOL: &'static str = "read_bookshelf";
    const UPDATE_TOOL: &'static str = "update_bookshelf";
    const DELETE_TOOL: &'static str = "delete_bookshelf";
    const LIST_TOOL: &'static str = "list_bookshelves";
    const NOTES: &'static str = " The books list replaces the shelf's current books.";

    type Draft = BookshelfDraft;
    type Patch = BookshelfPatch;
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookshelfDraft {
    #[schemars(description = "Bookshelf name (max 255 characters)")]
    pub name: String,

    #[schemars(description = "Plain text description")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[schemars(description = "IDs of the books to place on the shelf")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<u64>>,

    #[schemars(description = "Tags to attach")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Validate for BookshelfDraft {
    fn validate(&self) -> ToolResult<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BookshelfPatch {
    #[schemars(description = "New bookshelf name")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[schemars(description = "New plain text description")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[schemars(description = "Replacement list of book IDs")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<u64>>,

    #[schemars(description = "Replacement tag list")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Validate for BookshelfPatch {
    fn validate(&self) -> ToolResult<()> {
        validate_optional_name(&self.name)
    }
}

// ============================================================================
// Chapters
// ============================================================================

pub struct Chapter;

impl WikiEntity for Chapter {
    const ENDPOINT: &'static str = "/api/chapters";
    const NOUN: &'static str = "chapter";
    const PLURAL: &'static str = "chapters";
    const CREATE_TOOL: &'static str = "create_chapter";
    const READ_TOOL: &'static str = "read_chapter";
    const UPDATE_TOOL: &'static str = "update_chapter";
    const DELETE_TOOL: &'static str = "delete_chapter";
    const LIST_TOOL: &'static str = "list_chapters";
    const NOTES: &'static str = " Chapters always belong to a book.";

    type Draft = ChapterDraft;
    type Patch = ChapterPatch;
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChapterDraft {
    #[schemars(description = "ID of the parent book")]
    pub book_id: u64,

    #[schemars(description = "Chapter name (max 255 characters)")]
    pub name: String,

    #[schemars(description = "Plain text description")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[schemars(description = "Tags to attach")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Validate for ChapterDraft {
    fn validate(&self) -> ToolResult<()> {
        validate_name(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChapterPatch {
    #[schemars(description = "Move the chapter to this book")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<u64>,

    #[schemars(description = "New chapter name")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[schemars(description = "New plain text description")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[schemars(description = "Replacement tag list")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Validate for ChapterPatch {
    fn validate(&self) -> ToolResult<()> {
        validate_optional_name(&self.name)
    }
}

// ============================================================================
// Pages
// ============================================================================

pub struct Page;

impl WikiEntity for Page {
    const ENDPOINT: &'static str = "/api/pages";
    const NOUN: &'static str = "page";
    const PLURAL: &'static str = "pages";
    const CREATE_TOOL: &'static str = "create_page";
    const READ_TOOL: &'static str = "read_page";
    const UPDATE_TOOL: &'static str = "update_page";
    const DELETE_TOOL: &'static str = "delete_page";
    const LIST_TOOL: &'static str = "list_pages";
    const NOTES: &'static str =
        " A page lives in exactly one of a book (book_id) or a chapter (chapter_id).";

    type Draft = PageDraft;
    type Patch = PagePatch;
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageDraft {
    #[schemars(description = "ID of the parent book (exclusive with chapter_id)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<u64>,

    #[schemars(description = "ID of the parent chapter (exclusive with book_id)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<u64>,

    #[schemars(description = "Page name (max 255 characters)")]
    pub name: String,

    #[schemars(description = "Page body as HTML")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    #[schemars(description = "Page body as Markdown")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,

    #[schemars(description = "Tags to attach")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Validate for PageDraft {
    fn validate(&self) -> ToolResult<()> {
        validate_name(&self.name)?;
        match (self.book_id, self.chapter_id) {
            (Some(_), Some(_)) => {
                return Err(ToolError::invalid_arguments(
                    "provide either book_id or chapter_id, not both",
                ));
            }
            (None, None) => {
                return Err(ToolError::invalid_arguments(
                    "either book_id or chapter_id is required",
                ));
            }
            _ => {}
        }
        if self.html.is_none() && self.markdown.is_none() {
            return Err(ToolError::invalid_arguments(
                "either html or markdown content is required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PagePatch {
    #[schemars(description = "Move the page into this book")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<u64>,

    #[schemars(description = "Move the page into this chapter")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<u64>,

    #[schemars(description = "New page name")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[schemars(description = "New body as HTML")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    #[schemars(description = "New body as Markdown")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,

    #[schemars(description = "Replacement tag list")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl Validate for PagePatch {
    fn validate(&self) -> ToolResult<()> {
        validate_optional_name(&self.name)?;
        if self.book_id.is_some() && self.chapter_id.is_some() {
            return Err(ToolError::invalid_arguments(
                "provide either book_id or chapter_id, not both",
            ));
        }
        Ok(())
    }
}
