modelbase_core::entity! {
    /// The plain model type: base fields plus free-form attributes.
    pub struct BaseModel;
}
