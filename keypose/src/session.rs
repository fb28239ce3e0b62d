//! Walks an ordered list of images, keeping one annotation file per image.

use crate::annotator::Annotator;
use crate::config::SessionConfig;
use crate::error::SessionError;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Annotation file for an image: same path, `.json` extension.
pub fn annotation_path(image: &Path) -> PathBuf {
    image.with_extension("json")
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SessionError + '_ {
    move |source| SessionError::Io { path: path.to_path_buf(), source }
}

/// Reads the seen-images cache. A missing file is an empty cache.
pub fn read_cache(path: &Path) -> Result<Vec<PathBuf>, SessionError> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .map_err(|e| SessionError::Data { path: path.to_path_buf(), source: e.into() }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(io_err(path)(e)),
    }
}

pub struct Session<A: Annotator> {
    images: Vec<PathBuf>,
    index: usize,
    annotator: A,
    config: SessionConfig,
}

impl<A: Annotator> Session<A> {
    /// Builds a session over `images` in the given order and loads the first one.
    pub fn open(images: Vec<PathBuf>, annotator: A, config: SessionConfig) -> Result<Session<A>, SessionError> {
        let images = if config.cached_only {
            let cached = read_cache(&config.cache_file)?;
            images.into_iter().filter(|i| cached.contains(i)).collect()
        } else {
            images
        };
        if images.is_empty() {
            return Err(SessionError::NoImages);
        }
        let mut session = Session { images, index: 0, annotator, config };
        session.load()?;
        Ok(session)
    }

    pub fn annotator(&self) -> &A { &self.annotator }
    pub fn annotator_mut(&mut self) -> &mut A { &mut self.annotator }
    pub fn index(&self) -> usize { self.index }
    pub fn len(&self) -> usize { self.images.len() }
    pub fn is_empty(&self) -> bool { self.images.is_empty() }
    pub fn current_image(&self) -> &Path { &self.images[self.index] }

    pub fn current_annotation(&self) -> PathBuf {
        annotation_path(self.current_image())
    }

    /// Resets the annotator and fills it from the current image's file, if any.
    pub fn load(&mut self) -> Result<(), SessionError> {
        self.annotator.reset();
        let path = self.current_annotation();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(io_err(&path)(e)),
        };
        let data: Value = serde_json::from_str(&text)
            .map_err(|e| SessionError::Data { path: path.clone(), source: e.into() })?;
        self.annotator
            .set_data(data)
            .map_err(|source| SessionError::Data { path: path.clone(), source })?;
        info!(path = %path.display(), "annotations loaded");
        Ok(())
    }

    /// Writes the current annotations. Viewer sessions never write.
    pub fn save(&self) -> Result<(), SessionError> {
        if !self.annotator.allows_editing() {
            return Ok(());
        }
        let path = self.current_annotation();
        let text = serde_json::to_string(&self.annotator.get_data())
            .map_err(|e| SessionError::Data { path: path.clone(), source: e.into() })?;
        fs::write(&path, text).map_err(io_err(&path))?;
        info!(path = %path.display(), "annotations saved");
        Ok(())
    }

    fn go_to(&mut self, index: usize) -> Result<bool, SessionError> {
        if self.annotator.is_busy() || index >= self.images.len() || index == self.index {
            return Ok(false);
        }
        self.save()?;
        self.index = index;
        self.load()?;
        info!(index, image = %self.current_image().display(), "moved");
        Ok(true)
    }

    /// Saves and moves to the next image. Ignored while busy or on the last image.
    pub fn next(&mut self) -> Result<bool, SessionError> {
        self.go_to(self.index + 1)
    }

    /// Saves and moves to the previous image. Ignored while busy or on the first image.
    pub fn prev(&mut self) -> Result<bool, SessionError> {
        match self.index.checked_sub(1) {
            Some(i) => self.go_to(i),
            None => Ok(false),
        }
    }

    pub fn delete_last(&mut self) -> bool {
        self.annotator.delete_last()
    }

    /// Whether the session may close. A half-made annotation blocks closing;
    /// otherwise the current image is saved first.
    pub fn request_close(&self) -> Result<bool, SessionError> {
        if self.annotator.is_busy() {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Marks the current image as seen in the cache file.
    pub fn cache_current(&self) -> Result<(), SessionError> {
        let path = &self.config.cache_file;
        let mut cached = read_cache(path)?;
        let image = self.current_image().to_path_buf();
        if !cached.contains(&image) {
            cached.push(image);
        }
        let text = serde_json::to_string(&cached)
            .map_err(|e| SessionError::Data { path: path.clone(), source: e.into() })?;
        fs::write(path, text).map_err(io_err(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_path_replaces_extension() {
        assert_eq!(annotation_path(Path::new("a/b/img.png")), PathBuf::from("a/b/img.json"));
        assert_eq!(annotation_path(Path::new("a.dir/img.jpeg")), PathBuf::from("a.dir/img.json"));
        assert_eq!(annotation_path(Path::new("noext")), PathBuf::from("noext.json"));
    }
}
