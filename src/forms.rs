//! Forms
//!
//! Lifecycle hooks of the channel pricing form. A form runtime calls [`FormLifecycle::on_load`]
//! when data is bound to the form and [`FormLifecycle::on_submit`] when a submission arrives.

use std::mem;

use thiserror::Error;
use tracing::debug;

use crate::{
    channels::ChannelRepository,
    pricing::{
        ChannelPricings,
        reconciler::{finalize_submission, reconcile},
    },
    variants::{ProductVariant, VariantKey},
};

/// Errors raised by form lifecycle hooks.
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    /// The form was submitted without the parent variant it belongs to.
    #[error("channel pricings submitted without a parent variant")]
    MissingParent,
}

/// Data snapshot handed to lifecycle hooks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState<'a> {
    /// Channel pricing entries, keyed by channel code
    pub data: ChannelPricings<'a>,

    /// Variant the parent form is bound to
    pub parent: Option<VariantKey>,
}

impl<'a> FormState<'a> {
    /// Create a state for the given entries and parent variant.
    pub fn new(data: ChannelPricings<'a>, parent: Option<VariantKey>) -> Self {
        Self { data, parent }
    }
}

/// Hooks invoked by the form runtime.
pub trait FormLifecycle {
    /// Called when data is bound to the form.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] if the state cannot be prepared.
    fn on_load(&self, state: &mut FormState<'_>) -> Result<(), FormError>;

    /// Called when the form is submitted.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] if the submission cannot be finalized.
    fn on_submit(&self, state: &mut FormState<'_>) -> Result<(), FormError>;
}

/// Collection form holding one channel pricing per known channel.
#[derive(Debug)]
pub struct ChannelPricingsForm<R: ChannelRepository> {
    channels: R,
}

impl<R: ChannelRepository> ChannelPricingsForm<R> {
    /// Create a form backed by the given channel repository.
    pub fn new(channels: R) -> Self {
        Self { channels }
    }

}

impl<R: ChannelRepository> FormLifecycle for ChannelPricingsForm<R> {
    fn on_load(&self, state: &mut FormState<'_>) -> Result<(), FormError> {
        let all_channels = self.channels.find_all();

        state.data = reconcile(mem::take(&mut state.data), &all_channels);

        Ok(())
    }

    fn on_submit(&self, state: &mut FormState<'_>) -> Result<(), FormError> {
        let variant = state.parent.ok_or(FormError::MissingParent)?;

        state.data = finalize_submission(mem::take(&mut state.data), variant);

        Ok(())
    }
}

/// Variant generation form, extended with a channel pricings field.
#[derive(Debug)]
pub struct ProductVariantGenerationForm<R: ChannelRepository> {
    channel_pricings: ChannelPricingsForm<R>,
}

impl<R: ChannelRepository> ProductVariantGenerationForm<R> {
    /// Create the form with its channel pricings field.
    pub fn new(channel_pricings: ChannelPricingsForm<R>) -> Self {
        Self { channel_pricings }
    }

    /// Prepare the channel pricings field for a variant.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] if the channel pricings field fails to load.
    pub fn load<'a>(
        &self,
        key: VariantKey,
        variant: &ProductVariant<'a>,
    ) -> Result<FormState<'a>, FormError> {
        let mut state = FormState::new(variant.channel_pricings().clone(), Some(key));

        self.channel_pricings.on_load(&mut state)?;

        Ok(state)
    }

    /// Submit the channel pricings field and attach the result to the variant.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] if the channel pricings field rejects the submission.
    pub fn submit<'a>(
        &self,
        key: VariantKey,
        variant: &mut ProductVariant<'a>,
        mut state: FormState<'a>,
    ) -> Result<(), FormError> {
        state.parent = Some(key);

        self.channel_pricings.on_submit(&mut state)?;

        debug!(
            variant = variant.code.as_str(),
            channel_pricings = state.data.len(),
            "attached channel pricings to variant"
        );

        variant.set_channel_pricings(state.data);

        Ok(())
    }
}
