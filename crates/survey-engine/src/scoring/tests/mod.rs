mod weighted;
