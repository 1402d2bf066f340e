mod property_flatten;
