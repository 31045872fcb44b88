quantity!(Hours, suffix: "h", precision: 0);

impl Hours {
    pub const ONE: Self = Self(1.0);
}
