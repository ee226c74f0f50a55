use crate::extract::extractor::{ArrayRepr, ExtractOpts, extract};
use crate::foundation::error::FormResult;
use crate::foundation::notice::Notice;
use crate::instance::builder::{build, build_form};
use crate::instance::form::Form;
use crate::mutation::engine::MutationEngine;
use crate::mutation::request::Request;
use crate::path::form_path::FormPath;
use crate::path::resolve::resolve;
use crate::render::markup::to_markup;
use crate::render::view::{Element, LeafValue};
use crate::template::model::{Template, TemplateNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session configuration. Missing keys fall back to [`FormSessionOpts::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSessionOpts {
    /// Top-level leaves every extracted document must carry.
    pub mandatory_root_fields: Vec<String>,
    pub array_repr: ArrayRepr,
}

impl Default for FormSessionOpts {
    fn default() -> Self {
        let extract = ExtractOpts::default();
        Self {
            mandatory_root_fields: extract.mandatory_root_fields,
            array_repr: extract.array_repr,
        }
    }
}

impl FormSessionOpts {
    fn extract_opts(&self) -> ExtractOpts {
        ExtractOpts {
            mandatory_root_fields: self.mandatory_root_fields.clone(),
            array_repr: self.array_repr,
        }
    }
}

/// A validated template together with the live form built from it.
#[derive(Debug, Clone)]
pub struct FormSession {
    template: Template,
    form: Form,
    opts: FormSessionOpts,
}

impl FormSession {
    /// Validates `template` and seeds a fresh form from it.
    pub fn new(template: Template, opts: FormSessionOpts) -> FormResult<Self> {
        template.validate(&opts.mandatory_root_fields)?;
        let form = build_form(&template)?;
        Ok(Self {
            template,
            form,
            opts,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn opts(&self) -> &FormSessionOpts {
        &self.opts
    }

    /// Template node for a live identity, ignoring item ordinals.
    pub fn template_at(&self, path: &FormPath) -> Option<&TemplateNode> {
        resolve(&self.template, path)
    }

    /// Runs one mutation request against the live form.
    #[tracing::instrument(skip(self), fields(action = %req.action, target = %req.target))]
    pub fn apply(&mut self, req: &Request) -> FormResult<Notice> {
        MutationEngine::new(&self.template, &mut self.form).apply(req)
    }

    pub fn set_value(&mut self, path: &FormPath, value: LeafValue) -> FormResult<()> {
        self.form.set_value(path, value)
    }

    pub fn value_at(&self, path: &FormPath) -> Option<&LeafValue> {
        self.form.value_at(path)
    }

    pub fn element(&self, path: &FormPath) -> Option<&Element> {
        self.form.get(path)
    }

    /// A default-valued fragment for `path`, detached from the live form.
    pub fn fresh_fragment(&self, path: &FormPath) -> FormResult<Element> {
        build(&self.template, path)
    }

    pub fn markup(&self) -> String {
        self.form.markup()
    }

    /// Markup for the live element at `path`, if any.
    pub fn markup_at(&self, path: &FormPath) -> Option<String> {
        self.form.get(path).map(to_markup)
    }

    /// Extracts the output document with the session's options.
    pub fn extract(&self) -> FormResult<Value> {
        extract(&self.template, &self.form, &self.opts.extract_opts())
    }

    /// Discards all edits and rebuilds the form from the template.
    pub fn reset(&mut self) -> FormResult<()> {
        self.form = build_form(&self.template)?;
        tracing::debug!("form reset");
        Ok(())
    }
}
